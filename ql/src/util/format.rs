use num_format::{CustomFormat, Grouping, ToFormattedString};

pub fn number_format() -> CustomFormat {
    CustomFormat::builder()
        .grouping(Grouping::Standard)
        .minus_sign("-")
        .separator("_")
        .build()
        .expect("static number format should be valid")
}

/// `1000000` => `"1_000_000"`
pub fn format_count(value: usize) -> String {
    value.to_formatted_string(&number_format())
}
