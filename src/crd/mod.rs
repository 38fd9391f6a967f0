//! Example custom resource in its two served versions
//!
//! - `conversion.example.com/v1` - spec carries `field1`
//! - `conversion.example.com/v2` - spec carries `field1` and `field2`

pub mod conversion;
pub mod example;
