pub mod session;

pub use session::{FileSession, SessionProvider, StaticSession, TOKEN_KEY};
