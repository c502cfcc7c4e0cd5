//! Records as persisted by the store.

mod counsel;
mod journal;
mod post;
mod survey;
mod user;

pub use counsel::*;
pub use journal::*;
pub use post::*;
pub use survey::*;
pub use user::*;

use serde::{Deserialize, Serialize};

macro_rules! id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id!(
    /// Primary key of a [`User`].
    UserId
);
id!(SurveyResponseId);
id!(
    /// Primary key of a [`Post`].
    PostId
);
id!(CommentId);
id!(
    /// Primary key of a [`Day`].
    DayId
);
id!(GoalId);
id!(DiaryEntryId);
id!(CounselingRequestId);
