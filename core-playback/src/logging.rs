//! Log targets used by the playback core.
//!
//! Filter them with `RUST_LOG`, e.g. `RUST_LOG=playctl::state=info,playctl::service=debug`.

pub mod targets {
    /// State transitions.
    pub const STATE: &str = "playctl::state";
    /// Construction and teardown of states.
    pub const STATE_LIFECYCLE: &str = "playctl::state::lifecycle";
    /// Observer and probe activity.
    pub const SERVICE: &str = "playctl::service";
    /// Start and stop of observers and probes.
    pub const SERVICE_LIFECYCLE: &str = "playctl::service::lifecycle";
    pub const ERROR: &str = "playctl::error";
    /// Commands received from the application.
    pub const COMMAND: &str = "playctl::command";
    /// Commands rejected in the current state.
    pub const UNAVAILABLE_COMMAND: &str = "playctl::command::unavailable";
}
