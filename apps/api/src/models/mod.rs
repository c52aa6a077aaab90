pub mod post;
pub mod topic;
