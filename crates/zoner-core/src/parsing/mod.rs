pub mod values;

pub use values::parse_amount;
