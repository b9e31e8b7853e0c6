// Session gating and CORS for every request.
// The auth provider is only reached through `session::SessionProvider`.

pub mod context;
pub mod cors;
pub mod gate;
pub mod session;
