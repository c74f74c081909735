// Backend access layer: query encoding, the request dispatcher, per-table
// clients and the count estimator. Every outbound backend call goes through
// `Dispatcher::dispatch`.

pub mod count;
pub mod dispatcher;
pub mod error;
pub mod query;
pub mod resources;

#[cfg(test)]
pub(crate) mod test_support;

pub use count::{count, count_many};
pub use dispatcher::{merge_identity, DispatchOptions, Dispatcher, Method, Payload};
pub use error::RequestError;
pub use query::{encode_query, Direction, Filter, QueryValue};
pub use resources::{
    AnswerClient, ApplicantClient, InterviewClient, QuestionClient, ResourceClient,
};
