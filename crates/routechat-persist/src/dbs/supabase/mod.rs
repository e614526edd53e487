mod client;

pub use client::SupabaseProjectStore;
