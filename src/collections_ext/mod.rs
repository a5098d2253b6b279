pub mod counter;
pub mod grouped_counter;
