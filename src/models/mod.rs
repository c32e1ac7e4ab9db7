pub mod progress;
pub mod routine;
pub mod user;

pub use progress::{Progress, ProgressCreate, ProgressStats, ProgressUpdate};
pub use routine::{Routine, RoutineCreate, RoutineUpdate};
pub use user::{LoginRequest, NewUser, SignupRequest, User, UserResponse};
