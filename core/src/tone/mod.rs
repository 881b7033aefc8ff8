pub mod codec;

pub use codec::{DmrCaptures, Tone};
