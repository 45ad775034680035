//! Wire types for the indexing service.
//!
//! The query and search bodies look similar but are not the same: a query
//! descriptor carries the remote kind in `remote`, while a search
//! descriptor carries the full remote URL in `remote` and moves the kind
//! into `type`. The service treats these differently, so the two shapes
//! stay separate here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::RepoIdentity;

/// Body for the submit-for-indexing call.
#[derive(Debug, Clone, Serialize)]
pub struct IndexRequest {
    pub remote: String,
    pub repository: String,
    pub branch: String,
    pub reload: bool,
    pub notify: bool,
}

impl IndexRequest {
    pub fn new(identity: &RepoIdentity) -> Self {
        Self {
            remote: identity.remote_kind.as_str().to_string(),
            repository: identity.owner_repo.clone(),
            branch: identity.branch.clone(),
            reload: false,
            notify: true,
        }
    }
}

/// Status body for an indexed repository. Fields the service omits
/// deserialize to their defaults; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepoStatus {
    pub repository: String,
    pub remote: String,
    pub branch: String,
    pub private: bool,
    pub status: String,
    pub files_processed: u64,
    pub num_files: u64,
    pub sample_questions: Vec<String>,
    pub sha: String,
}

/// Composite key addressing a repository's status resource:
/// `remoteKind:branch:owner/repo`, escaped as a single path segment by
/// the client.
pub fn status_key(identity: &RepoIdentity) -> String {
    format!(
        "{}:{}:{}",
        identity.remote_kind.as_str(),
        identity.branch,
        identity.owner_repo
    )
}

/// One user message inside a query body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMessage {
    pub id: String,
    pub content: String,
    pub role: String,
}

/// Repository descriptor inside a query body. `remote` is the remote kind.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRepo {
    pub remote: String,
    pub branch: String,
    pub repository: String,
}

/// Body for the query endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub messages: Vec<QueryMessage>,
    pub repositories: Vec<QueryRepo>,
    pub session_id: String,
    pub stream: bool,
    pub genius: bool,
}

impl QueryRequest {
    pub fn new(identity: &RepoIdentity, question: &str) -> Self {
        Self {
            messages: vec![QueryMessage {
                id: Uuid::new_v4().to_string(),
                content: question.to_string(),
                role: "user".to_string(),
            }],
            repositories: vec![QueryRepo {
                remote: identity.remote_kind.as_str().to_string(),
                branch: identity.branch.clone(),
                repository: identity.owner_repo.clone(),
            }],
            session_id: Uuid::new_v4().to_string(),
            stream: true,
            genius: true,
        }
    }
}

/// Repository descriptor inside a search body. Unlike queries, `remote`
/// carries the full remote URL and the kind moves into `type`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRepo {
    pub remote: String,
    pub branch: String,
    pub repository: String,
    #[serde(rename = "type")]
    pub remote_type: String,
}

/// Body for the search endpoint. No `genius` flag here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub repositories: Vec<SearchRepo>,
    pub session_id: String,
    pub stream: bool,
}

impl SearchRequest {
    pub fn new(identity: &RepoIdentity, query: &str) -> Self {
        Self {
            query: query.to_string(),
            repositories: vec![SearchRepo {
                remote: identity.remote_url.clone(),
                branch: identity.branch.clone(),
                repository: identity.owner_repo.clone(),
                remote_type: identity.remote_kind.as_str().to_string(),
            }],
            session_id: Uuid::new_v4().to_string(),
            stream: true,
        }
    }
}
