//! Supabase adapter: PostgREST queries and Realtime change streams.

pub mod client_handle;
pub mod dto;
pub mod realtime_client;
pub mod rest_client;

pub use client_handle::SupabaseHandle;
pub use realtime_client::RealtimeClient;
pub use rest_client::SupabaseRestClient;
