//! Resource Clients — one thin client per backend table, all sharing the
//! same [`Dispatcher`].
//!
//! No field validation happens here; forms validate before calling. The only
//! invariant applied on the way out is the dispatcher's identity merge.

use std::marker::PhantomData;

use tracing::debug;

use crate::backend::count::{count, count_many};
use crate::backend::dispatcher::{DispatchOptions, Dispatcher, Payload};
use crate::backend::error::RequestError;
use crate::backend::query::{Direction, Filter};
use crate::models::{Applicant, ApplicantAnswer, Interview, Question, Resource};

pub type InterviewClient = ResourceClient<Interview>;
pub type QuestionClient = ResourceClient<Question>;
pub type ApplicantClient = ResourceClient<Applicant>;
pub type AnswerClient = ResourceClient<ApplicantAnswer>;

/// List/create/update/delete for one table.
pub struct ResourceClient<R: Resource> {
    dispatcher: Dispatcher,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.dispatcher.clone())
    }
}

fn id_filter(id: i64) -> Filter {
    Filter::new().eq("id", id)
}

fn rows<R: Resource>(payload: Option<Payload>) -> Result<Vec<R>, RequestError> {
    match payload {
        Some(payload) => payload.into_json(),
        None => Ok(Vec::new()),
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            _resource: PhantomData,
        }
    }

    /// Forwards `filter` to the backend unchanged.
    pub async fn list(&self, filter: Option<Filter>) -> Result<Vec<R>, RequestError> {
        let payload = self
            .dispatcher
            .dispatch(R::PATH, DispatchOptions::get(filter))
            .await?;
        rows(payload)
    }

    pub async fn get(&self, id: i64) -> Result<Option<R>, RequestError> {
        let filter = id_filter(id).limit(1);
        Ok(self.list(Some(filter)).await?.into_iter().next())
    }

    /// POSTs the partial record and returns the stored row.
    pub async fn create(&self, draft: &R::Draft) -> Result<R, RequestError> {
        let body = serde_json::to_value(draft)?;
        let payload = self
            .dispatcher
            .dispatch(R::PATH, DispatchOptions::post(body))
            .await?;

        rows::<R>(payload)?.into_iter().next().ok_or_else(|| {
            RequestError::UnexpectedShape(format!("create on {} returned no row", R::PATH))
        })
    }

    /// PATCHes the row with `id`. `None` when no row matched.
    pub async fn update(&self, id: i64, draft: &R::Draft) -> Result<Option<R>, RequestError> {
        let body = serde_json::to_value(draft)?;
        let payload = self
            .dispatcher
            .dispatch(R::PATH, DispatchOptions::patch(id_filter(id), body))
            .await?;
        Ok(rows::<R>(payload)?.into_iter().next())
    }

    pub async fn delete(&self, id: i64) -> Result<(), RequestError> {
        let payload = self
            .dispatcher
            .dispatch(R::PATH, DispatchOptions::delete(id_filter(id)))
            .await?;
        if payload.is_some() {
            debug!(path = R::PATH, id, "delete returned a body; ignoring it");
        }
        Ok(())
    }
}

impl ResourceClient<Interview> {
    pub async fn question_count(&self, interview_id: i64) -> Result<u64, RequestError> {
        count(
            &self.dispatcher,
            Question::PATH,
            Filter::new().eq("interview_id", interview_id),
        )
        .await
    }

    pub async fn applicant_count(&self, interview_id: i64) -> Result<u64, RequestError> {
        count(
            &self.dispatcher,
            Applicant::PATH,
            Filter::new().eq("interview_id", interview_id),
        )
        .await
    }

    /// Question counts for many interviews at once, in input order.
    pub async fn question_counts(&self, interview_ids: &[i64]) -> Result<Vec<u64>, RequestError> {
        let filters = interview_ids
            .iter()
            .map(|id| Filter::new().eq("interview_id", id))
            .collect();
        count_many(&self.dispatcher, Question::PATH, filters).await
    }
}

impl ResourceClient<Question> {
    pub async fn for_interview(&self, interview_id: i64) -> Result<Vec<Question>, RequestError> {
        let filter = Filter::new()
            .eq("interview_id", interview_id)
            .order("id", Direction::Asc);
        self.list(Some(filter)).await
    }
}

impl ResourceClient<Applicant> {
    pub async fn answer_count(&self, applicant_id: i64) -> Result<u64, RequestError> {
        count(
            &self.dispatcher,
            ApplicantAnswer::PATH,
            Filter::new().eq("applicant_id", applicant_id),
        )
        .await
    }
}

impl ResourceClient<ApplicantAnswer> {
    pub async fn for_applicant(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<ApplicantAnswer>, RequestError> {
        let filter = Filter::new()
            .eq("applicant_id", applicant_id)
            .order("question_id", Direction::Asc);
        self.list(Some(filter)).await
    }
}
