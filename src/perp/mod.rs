pub mod hyperliquid;
pub mod vest;

// Re-export
pub use hyperliquid::Hyperliquid;
pub use vest::Vest;
