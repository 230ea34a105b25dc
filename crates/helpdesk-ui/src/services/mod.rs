//! Browser-facing transport: HTTP gateway, websocket channel and the
//! durable credential mirror. Everything here is wasm-only; the logic it
//! delegates to lives DOM-free under `core`.

pub(crate) mod api;
pub(crate) mod storage;
pub(crate) mod ws;
