//! Feature slices. Each slice keeps its state DOM-free and confines API
//! calls and rendering to its own `api`/`view` modules.

pub mod tickets;
