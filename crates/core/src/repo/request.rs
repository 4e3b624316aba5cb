//! Service-request repository.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::model::{self, NewServiceRequest, ServiceRequest};
use crate::store::{CollectionStore, keys};
use crate::taxonomy::RequestStatus;
use crate::types::{RequestId, UserId};

/// Fields a requester may edit on their own pending request.
const USER_EDITABLE_FIELDS: &[&str] = &["notes", "cancelRequested"];

/// Outcome of a user-initiated request edit.
///
/// A disallowed edit is an expected, testable business outcome — it never
/// raises an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[must_use]
pub enum RequestUpdateOutcome {
    /// The edit was applied.
    Updated(ServiceRequest),
    /// No request with that id belongs to the user.
    NotFound,
    /// The request has left `pending`, or a non-editable field was targeted.
    ForbiddenFieldsOrState,
}

/// Repository for the service-request collection.
pub struct ServiceRequestRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> ServiceRequestRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    /// Create a request for `user_id`. Always starts `pending`.
    ///
    /// # Errors
    ///
    /// Rejects empty notes; propagates store failures.
    pub fn submit(&self, user_id: &UserId, input: NewServiceRequest) -> Result<ServiceRequest> {
        if input.notes.trim().is_empty() {
            return Err(ValidationError::new("notes", "non-empty string").into());
        }

        let request = ServiceRequest {
            id: RequestId::random(),
            user_id: user_id.clone(),
            request_type: input.request_type,
            phone: input.phone,
            location: input.location,
            notes: input.notes,
            preferred_time: input.preferred_time,
            status: RequestStatus::Pending,
            cancel_requested: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let encoded = model::to_value(&request);
        self.store.update(keys::REQUESTS, &mut |mut rows| {
            rows.push(encoded.clone());
            rows
        })?;
        tracing::info!(user = %user_id, request = %request.id, kind = %request.request_type, "service request submitted");
        Ok(request)
    }

    /// The user's request history, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn list_by_user(&self, user_id: &UserId) -> Result<Vec<ServiceRequest>> {
        let mut rows: Vec<ServiceRequest> = self
            .store
            .get(keys::REQUESTS)?
            .iter()
            .map(ServiceRequest::from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|row| &row.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Apply a user edit to one of their requests.
    ///
    /// Edits are allow-listed (`notes`, `cancelRequested`) and only accepted
    /// while the request is still `pending`. Anything else yields
    /// [`RequestUpdateOutcome::ForbiddenFieldsOrState`].
    ///
    /// # Errors
    ///
    /// Malformed field values (wrong JSON type, empty update set) are
    /// validation errors; disallowed edits are outcomes, not errors.
    pub fn update_by_user(
        &self,
        user_id: &UserId,
        request_id: &RequestId,
        updates: &Map<String, Value>,
    ) -> Result<RequestUpdateOutcome> {
        if updates.is_empty() {
            return Err(ValidationError::new("updates", "at least one field").into());
        }
        if updates
            .keys()
            .any(|key| !USER_EDITABLE_FIELDS.contains(&key.as_str()))
        {
            return Ok(RequestUpdateOutcome::ForbiddenFieldsOrState);
        }

        let notes = match updates.get("notes") {
            None => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(_) => return Err(ValidationError::new("notes", "non-empty string").into()),
        };
        let cancel_requested = match updates.get("cancelRequested") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err(ValidationError::new("cancelRequested", "boolean").into()),
        };

        let mut outcome: std::result::Result<RequestUpdateOutcome, ValidationError> =
            Ok(RequestUpdateOutcome::NotFound);

        self.store.update(keys::REQUESTS, &mut |mut rows| {
            let found = rows.iter_mut().find(|row| {
                row.get("id").and_then(|v| v.as_str()) == Some(request_id.as_str())
                    && row.get("userId").and_then(|v| v.as_str()) == Some(user_id.as_str())
            });
            let Some(slot) = found else {
                return rows;
            };

            let mut request = match ServiceRequest::from_value(slot) {
                Ok(request) => request,
                Err(err) => {
                    outcome = Err(err);
                    return rows;
                }
            };

            if request.status != RequestStatus::Pending {
                outcome = Ok(RequestUpdateOutcome::ForbiddenFieldsOrState);
                return rows;
            }

            if let Some(notes) = &notes {
                request.notes = notes.clone();
            }
            if let Some(cancel) = cancel_requested {
                request.cancel_requested = Some(cancel);
            }
            request.updated_at = Some(Utc::now());

            *slot = model::to_value(&request);
            outcome = Ok(RequestUpdateOutcome::Updated(request));
            rows
        })?;

        outcome.map_err(Into::into)
    }

    /// Drop every request belonging to a user (erasure cascade).
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn remove_all_for_user(&self, user_id: &UserId) -> Result<usize> {
        let mut dropped = 0;
        self.store.update(keys::REQUESTS, &mut |rows| {
            let before = rows.len();
            let kept: Vec<_> = rows
                .into_iter()
                .filter(|row| row.get("userId").and_then(|v| v.as_str()) != Some(user_id.as_str()))
                .collect();
            dropped = before - kept.len();
            kept
        })?;
        Ok(dropped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::taxonomy::RequestType;
    use serde_json::json;

    fn new_request(kind: RequestType, notes: &str) -> NewServiceRequest {
        NewServiceRequest {
            request_type: kind,
            phone: None,
            location: None,
            notes: notes.to_owned(),
            preferred_time: None,
        }
    }

    fn updates(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_submit_starts_pending() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let request = repo
            .submit(&UserId::new("user-1"), new_request(RequestType::Maid, "help"))
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn test_history_is_descending_and_owner_scoped() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let user = UserId::new("user-1");

        repo.submit(&user, new_request(RequestType::Maid, "first"))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.submit(&user, new_request(RequestType::Driver, "second"))
            .unwrap();
        repo.submit(
            &UserId::new("user-2"),
            new_request(RequestType::Escort, "other user"),
        )
        .unwrap();

        let history = repo.list_by_user(&user).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().notes, "second");
        assert_eq!(history.get(1).unwrap().notes, "first");
    }

    #[test]
    fn test_update_allows_notes_while_pending() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let user = UserId::new("user-1");
        let request = repo
            .submit(&user, new_request(RequestType::Maid, "before"))
            .unwrap();

        let outcome = repo
            .update_by_user(&user, &request.id, &updates(json!({"notes": "after"})))
            .unwrap();
        match outcome {
            RequestUpdateOutcome::Updated(updated) => {
                assert_eq!(updated.notes, "after");
                assert!(updated.updated_at.is_some());
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_update_rejects_disallowed_field() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let user = UserId::new("user-1");
        let request = repo
            .submit(&user, new_request(RequestType::Maid, "notes"))
            .unwrap();

        let outcome = repo
            .update_by_user(
                &user,
                &request.id,
                &updates(json!({"preferredTime": "tomorrow"})),
            )
            .unwrap();
        assert_eq!(outcome, RequestUpdateOutcome::ForbiddenFieldsOrState);
    }

    #[test]
    fn test_update_locked_once_accepted() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let user = UserId::new("user-1");
        let request = repo
            .submit(&user, new_request(RequestType::Maid, "notes"))
            .unwrap();

        // Operator moves the request along (out-of-scope workflow, simulated
        // by editing the stored row directly).
        store
            .update(keys::REQUESTS, &mut |mut rows| {
                for row in &mut rows {
                    row["status"] = json!("accepted");
                }
                rows
            })
            .unwrap();

        let outcome = repo
            .update_by_user(&user, &request.id, &updates(json!({"notes": "too late"})))
            .unwrap();
        assert_eq!(outcome, RequestUpdateOutcome::ForbiddenFieldsOrState);
    }

    #[test]
    fn test_update_unknown_request_is_not_found() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let outcome = repo
            .update_by_user(
                &UserId::new("user-1"),
                &RequestId::new("missing"),
                &updates(json!({"notes": "x"})),
            )
            .unwrap();
        assert_eq!(outcome, RequestUpdateOutcome::NotFound);
    }

    #[test]
    fn test_cancel_requested_is_a_flag_not_a_transition() {
        let store = MemoryStore::new();
        let repo = ServiceRequestRepository::new(&store);
        let user = UserId::new("user-1");
        let request = repo
            .submit(&user, new_request(RequestType::Driver, "school run"))
            .unwrap();

        let outcome = repo
            .update_by_user(&user, &request.id, &updates(json!({"cancelRequested": true})))
            .unwrap();
        match outcome {
            RequestUpdateOutcome::Updated(updated) => {
                assert_eq!(updated.cancel_requested, Some(true));
                assert_eq!(updated.status, RequestStatus::Pending);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }
}
