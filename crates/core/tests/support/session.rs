//! In-memory mock for `FramerSession` and `SessionConnector`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use framesync_core::session::{FramerSession, ProjectTarget, SessionConnector};
use framesync_domain::{
    ChangeSet, ChangedPaths, CollectionItem, CollectionSummary, Deployment, FieldDefinition,
    FieldInput, FieldType, FramesyncError, Hostname, ProjectInfo, PublishResult,
    Result as DomainResult,
};

/// How `add_items` behaves
#[derive(Debug, Clone)]
pub enum WriteMode {
    /// Apply the batch and echo every written item
    Echo,
    /// Apply the batch but return nothing
    Silent,
    /// Apply the batch and echo only the first `n` items
    Partial(usize),
    /// Accept the call but never apply it
    Lost,
    /// Fail with a transport error
    Fail(String),
    /// Never complete
    Hang,
}

#[derive(Debug)]
struct State {
    collections: Vec<CollectionSummary>,
    items: Vec<CollectionItem>,
    fields: Vec<FieldDefinition>,
    write_mode: WriteMode,
    /// Snapshot served instead of `items` for the next N fetches after a write
    stale: Option<(usize, Vec<CollectionItem>)>,
    stale_fetches: usize,
    fail_fetch_on_call: Option<usize>,
    fetch_calls: usize,
    writes: Vec<Vec<ChangeSet>>,
    removed: Vec<Vec<String>>,
    added_fields: Vec<Vec<FieldInput>>,
    deploys: Vec<String>,
    publish: PublishResult,
    disconnects: usize,
    next_id: usize,
}

/// In-memory Framer project with a single scripted behaviour per call.
#[derive(Clone)]
pub struct FakeSession {
    state: Arc<Mutex<State>>,
}

impl FakeSession {
    /// Create a session holding one empty collection `collection_id`.
    pub fn new(collection_id: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                collections: vec![CollectionSummary {
                    id: collection_id.into(),
                    name: "Posts".into(),
                    managed_by: "user".into(),
                }],
                items: Vec::new(),
                fields: Vec::new(),
                write_mode: WriteMode::Echo,
                stale: None,
                stale_fetches: 0,
                fail_fetch_on_call: None,
                fetch_calls: 0,
                writes: Vec::new(),
                removed: Vec::new(),
                added_fields: Vec::new(),
                deploys: Vec::new(),
                publish: PublishResult {
                    deployment: Some(Deployment {
                        id: "dep-1".into(),
                        created_at: "2026-01-01T00:00:00Z".into(),
                        updated_at: "2026-01-01T00:00:00Z".into(),
                    }),
                    hostnames: Vec::new(),
                },
                disconnects: 0,
                next_id: 1,
            })),
        }
    }

    pub fn with_items(self, items: Vec<CollectionItem>) -> Self {
        self.lock().items = items;
        self
    }

    pub fn with_fields(self, fields: Vec<FieldDefinition>) -> Self {
        self.lock().fields = fields;
        self
    }

    pub fn with_write_mode(self, mode: WriteMode) -> Self {
        self.lock().write_mode = mode;
        self
    }

    /// After a write, serve the pre-write snapshot for the next `fetches`
    /// collection reads.
    pub fn with_stale_reads(self, fetches: usize) -> Self {
        self.lock().stale_fetches = fetches;
        self
    }

    /// Fail the `call`-th collection read (1-based).
    pub fn failing_fetch(self, call: usize) -> Self {
        self.lock().fail_fetch_on_call = Some(call);
        self
    }

    pub fn with_publish(self, publish: PublishResult) -> Self {
        self.lock().publish = publish;
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.lock().fetch_calls
    }

    pub fn writes(&self) -> Vec<Vec<ChangeSet>> {
        self.lock().writes.clone()
    }

    pub fn items(&self) -> Vec<CollectionItem> {
        self.lock().items.clone()
    }

    pub fn removed(&self) -> Vec<Vec<String>> {
        self.lock().removed.clone()
    }

    pub fn added_fields(&self) -> Vec<Vec<FieldInput>> {
        self.lock().added_fields.clone()
    }

    pub fn deploys(&self) -> Vec<String> {
        self.lock().deploys.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.lock().disconnects
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake session mutex poisoned")
    }

    fn apply(state: &mut State, batch: &[ChangeSet]) -> Vec<CollectionItem> {
        batch
            .iter()
            .map(|change| {
                let position = change
                    .id
                    .as_ref()
                    .and_then(|id| state.items.iter().position(|item| &item.id == id));
                let position = match position {
                    Some(position) => position,
                    None => {
                        let id = change.id.clone().unwrap_or_else(|| {
                            let id = state.next_id.to_string();
                            state.next_id += 1;
                            id
                        });
                        state.items.push(CollectionItem { id, draft: Some(false), ..CollectionItem::default() });
                        state.items.len() - 1
                    }
                };
                let item = &mut state.items[position];
                if let Some(slug) = &change.slug {
                    item.slug = Some(slug.clone());
                }
                if let Some(draft) = change.draft {
                    item.draft = Some(draft);
                }
                if let Some(field_data) = &change.field_data {
                    for (key, value) in field_data {
                        item.field_data.insert(key.clone(), value.clone());
                    }
                }
                item.clone()
            })
            .collect()
    }
}

#[async_trait]
impl FramerSession for FakeSession {
    async fn project_info(&self) -> DomainResult<ProjectInfo> {
        Ok(ProjectInfo { id: "project-1".into(), name: "Site".into(), api_version1_id: None })
    }

    async fn changed_paths(&self) -> DomainResult<ChangedPaths> {
        Ok(ChangedPaths { added: vec!["/new".into()], removed: Vec::new(), modified: Vec::new() })
    }

    async fn change_contributors(
        &self,
        from_version: Option<u64>,
        to_version: Option<u64>,
    ) -> DomainResult<Vec<String>> {
        Ok(vec![format!("{from_version:?}..{to_version:?}")])
    }

    async fn publish(&self) -> DomainResult<PublishResult> {
        Ok(self.lock().publish.clone())
    }

    async fn deploy(&self, deployment_id: &str) -> DomainResult<Vec<Hostname>> {
        self.lock().deploys.push(deployment_id.to_string());
        Ok(vec![Hostname {
            hostname: "site.framer.website".into(),
            kind: "default".into(),
            is_primary: true,
            is_published: true,
            deployment_id: deployment_id.to_string(),
        }])
    }

    async fn create_managed_collection(&self, name: &str) -> DomainResult<CollectionSummary> {
        let collection = CollectionSummary {
            id: format!("managed-{name}"),
            name: name.to_string(),
            managed_by: "this-plugin".into(),
        };
        self.lock().collections.push(collection.clone());
        Ok(collection)
    }

    async fn collections(&self) -> DomainResult<Vec<CollectionSummary>> {
        Ok(self.lock().collections.clone())
    }

    async fn collection(&self, collection_id: &str) -> DomainResult<Option<CollectionSummary>> {
        Ok(self.lock().collections.iter().find(|c| c.id == collection_id).cloned())
    }

    async fn collection_items(&self, _collection_id: &str) -> DomainResult<Vec<CollectionItem>> {
        let mut state = self.lock();
        state.fetch_calls += 1;
        if state.fail_fetch_on_call == Some(state.fetch_calls) {
            return Err(FramesyncError::Transport("connection reset".into()));
        }
        if let Some((remaining, snapshot)) = state.stale.take() {
            if remaining > 0 {
                state.stale = Some((remaining - 1, snapshot.clone()));
                return Ok(snapshot);
            }
        }
        Ok(state.items.clone())
    }

    async fn add_items(
        &self,
        _collection_id: &str,
        items: &[ChangeSet],
    ) -> DomainResult<Vec<CollectionItem>> {
        let mode = {
            let mut state = self.lock();
            state.writes.push(items.to_vec());
            state.write_mode.clone()
        };

        match &mode {
            WriteMode::Fail(message) => return Err(FramesyncError::Transport(message.clone())),
            WriteMode::Hang => return std::future::pending().await,
            WriteMode::Lost => return Ok(Vec::new()),
            _ => {}
        }

        let mut state = self.lock();
        if state.stale_fetches > 0 {
            state.stale = Some((state.stale_fetches, state.items.clone()));
        }
        let applied = Self::apply(&mut state, items);
        Ok(match mode {
            WriteMode::Echo => applied,
            WriteMode::Partial(count) => applied.into_iter().take(count).collect(),
            _ => Vec::new(),
        })
    }

    async fn remove_items(&self, _collection_id: &str, item_ids: &[String]) -> DomainResult<()> {
        let mut state = self.lock();
        state.items.retain(|item| !item_ids.contains(&item.id));
        state.removed.push(item_ids.to_vec());
        Ok(())
    }

    async fn fields(&self, _collection_id: &str) -> DomainResult<Vec<FieldDefinition>> {
        Ok(self.lock().fields.clone())
    }

    async fn add_fields(
        &self,
        _collection_id: &str,
        fields: &[FieldInput],
    ) -> DomainResult<Vec<FieldDefinition>> {
        let mut state = self.lock();
        state.added_fields.push(fields.to_vec());
        let created: Vec<FieldDefinition> = fields
            .iter()
            .enumerate()
            .map(|(position, input)| FieldDefinition {
                id: format!("field-{position}"),
                name: input.name.clone().unwrap_or_default(),
                field_type: FieldType::String,
                cases: Vec::new(),
            })
            .collect();
        state.fields.extend(created.clone());
        Ok(created)
    }

    async fn disconnect(&self) -> DomainResult<()> {
        self.lock().disconnects += 1;
        Ok(())
    }
}

/// Connector handing out clones of one fake session.
#[derive(Clone)]
pub struct FakeConnector {
    pub session: FakeSession,
    pub fail_with: Option<FramesyncError>,
}

impl FakeConnector {
    pub fn new(session: FakeSession) -> Self {
        Self { session, fail_with: None }
    }
}

#[async_trait]
impl SessionConnector for FakeConnector {
    async fn connect(&self, _target: &ProjectTarget) -> DomainResult<Arc<dyn FramerSession>> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(Arc::new(self.session.clone()))
    }
}
