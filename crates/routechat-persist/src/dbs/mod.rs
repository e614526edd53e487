pub mod memory;
#[cfg(feature = "supabase")]
pub mod supabase;
