pub mod services;
pub mod supabase;
