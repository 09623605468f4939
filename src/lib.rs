//! Single-slot persistence: one named value in durable storage, mirrored
//! by a presentation binding that loads it once, writes validated drafts
//! through, and clears it on request.

pub mod binding;
pub mod config;
pub mod screen;
pub mod slot;
pub mod storage;

#[cfg(test)]
mod test_helpers;
