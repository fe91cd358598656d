//! Eviction policies.
//!
//! | Policy          | Tiers               | Victim                          |
//! |-----------------|---------------------|---------------------------------|
//! | `LirsPolicy`    | low, high           | oldest high, else oldest low    |
//! | `TinyFluPolicy` | one recency queue   | least recently touched          |
//! | `S3FifoPolicy`  | short, medium, long | oldest of lowest non-empty tier |

pub mod lirs;
pub mod s3_fifo;
pub mod tiny_flu;

pub use lirs::{LirsPolicy, LirsTier};
pub use s3_fifo::{S3FifoPolicy, S3Tier};
pub use tiny_flu::TinyFluPolicy;
