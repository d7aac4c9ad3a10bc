//! WebSocket endpoints. Each socket subscribes to exactly one channel for its whole
//! lifetime: `/ws/dogs`, `/ws/cats` or `/ws/status`.

pub(crate) mod handler;
