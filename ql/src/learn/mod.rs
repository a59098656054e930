pub mod q_table;
pub mod trainer;
