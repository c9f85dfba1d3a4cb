//! Newsfeed core: article model, feed requests and the pure feed state machine.
mod article;
mod effect;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use article::{same_article, Article, PartialArticle, PLACEHOLDER_IMAGE, UNKNOWN_SOURCE};
pub use effect::Effect;
pub use msg::Msg;
pub use request::{FeedMode, FeedRequest, FeedResult, CATEGORIES, DEFAULT_CATEGORY, PAGE_SIZE};
pub use state::{FeedState, FeedStatus, RequestId};
pub use update::update;
pub use view_model::FeedViewModel;
