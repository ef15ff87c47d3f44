mod login;
mod play;
mod state;
mod stats;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use login::LoginView;
pub use play::PlayView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use stats::StatsView;
