mod ids;
mod question;
mod result;
mod user;

pub use ids::{ResultId, UserId};
pub use question::{Catalog, CatalogError, Question};
pub use result::{GameResult, GameResultError, Tally};
pub use user::{Credentials, PasswordHash, User, UserError, Username};
