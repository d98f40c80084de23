//! List-view controller: paging, local search, and fetch bookkeeping.
//!
//! Each page change issues a [`FetchTicket`]. Only the response for the most
//! recently issued ticket is applied; a late response for a superseded page is
//! dropped so it cannot overwrite newer data.

use userdesk_core::{DomainResult, PaginationState, Roster, UserId, UserPatch, UserRecord};

use crate::client::DirectoryApi;
use crate::error::DirectoryError;
use crate::notification::{FETCH_FAILED, Notifications};
use crate::types::UserPage;

/// Identifies one issued page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    page: u32,
    generation: u64,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Phase of the current fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading(FetchTicket),
    Loaded,
    Failed(DirectoryError),
}

/// What happened to a fetch response handed to [`ListController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The roster now holds the fetched page.
    Applied,
    /// The fetch failed; the previous roster stays visible.
    Failed,
    /// The response belonged to a superseded fetch and was ignored.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct ListController {
    roster: Roster,
    pagination: PaginationState,
    query: String,
    phase: FetchPhase,
    generation: u64,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new()
    }
}

impl ListController {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            pagination: PaginationState::new(),
            query: String::new(),
            phase: FetchPhase::Idle,
            generation: 0,
        }
    }

    /// Start loading the current page (view mounted or explicit refresh).
    pub fn mount(&mut self) -> FetchTicket {
        self.issue(self.pagination.current_page())
    }

    /// Move to `page` and start loading it.
    ///
    /// The current page changes immediately, whatever the fetch's fate.
    pub fn set_page(&mut self, page: u32) -> DomainResult<FetchTicket> {
        self.pagination.go_to(page)?;
        Ok(self.issue(page))
    }

    fn issue(&mut self, page: u32) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            page,
            generation: self.generation,
        };
        self.phase = FetchPhase::Loading(ticket);
        tracing::debug!(page, generation = ticket.generation, "fetch issued");
        ticket
    }

    /// Hand the result of the fetch identified by `ticket` to the controller.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<UserPage, DirectoryError>,
        notes: &mut Notifications,
    ) -> FetchOutcome {
        if self.phase != FetchPhase::Loading(ticket) {
            tracing::debug!(page = ticket.page, generation = ticket.generation, "stale fetch discarded");
            return FetchOutcome::Discarded;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => return self.fail(err, notes),
        };

        let total_pages = page.total_pages;
        if let Err(err) = self.roster.replace(page.data) {
            return self.fail(DirectoryError::fetch(None, err.to_string()), notes);
        }
        self.pagination.set_total_pages(total_pages);
        self.phase = FetchPhase::Loaded;
        tracing::info!(
            page = ticket.page,
            users = self.roster.len(),
            total_pages = self.pagination.total_pages(),
            "page loaded"
        );
        FetchOutcome::Applied
    }

    fn fail(&mut self, err: DirectoryError, notes: &mut Notifications) -> FetchOutcome {
        tracing::warn!(page = self.pagination.current_page(), "fetch failed: {err}");
        notes.error(FETCH_FAILED);
        self.phase = FetchPhase::Failed(err);
        FetchOutcome::Failed
    }

    /// Move to `page`, fetch it and apply the result.
    pub async fn load<D: DirectoryApi>(
        &mut self,
        api: &D,
        page: u32,
        notes: &mut Notifications,
    ) -> DomainResult<FetchOutcome> {
        let ticket = self.set_page(page)?;
        let result = api.list_users(page).await;
        Ok(self.apply(ticket, result, notes))
    }

    /// Re-fetch the current page.
    pub async fn refresh<D: DirectoryApi>(&mut self, api: &D, notes: &mut Notifications) -> FetchOutcome {
        let ticket = self.mount();
        let result = api.list_users(ticket.page).await;
        self.apply(ticket, result, notes)
    }

    /// Change the search text. Filtering is local; nothing is fetched.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The loaded roster narrowed by the current query.
    pub fn filtered(&self) -> Vec<&UserRecord> {
        self.roster.filtered(&self.query)
    }

    /// "N user found" / "N users found" for the filtered view.
    pub fn summary(&self) -> String {
        let count = self.filtered().len();
        let noun = if count == 1 { "user" } else { "users" };
        format!("{count} {noun} found")
    }

    /// Page controls only make sense on the unfiltered, non-empty roster.
    pub fn pagination_visible(&self) -> bool {
        self.query.is_empty() && !self.roster.is_empty()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Loading(_))
    }

    pub fn last_error(&self) -> Option<&DirectoryError> {
        match &self.phase {
            FetchPhase::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Mirror an acknowledged update. Returns `false` if `id` is not loaded.
    pub fn reconcile_update(&mut self, id: UserId, patch: &UserPatch) -> bool {
        self.roster.apply_patch(id, patch)
    }

    /// Mirror an acknowledged delete. Returns `false` if `id` is not loaded.
    pub fn reconcile_delete(&mut self, id: UserId) -> bool {
        self.roster.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Severity;
    use crate::testing::{FakeDirectory, page_one, page_two, user};

    #[tokio::test]
    async fn mount_loads_first_page() {
        let api = FakeDirectory::two_pages();
        let mut list = ListController::new();
        let mut notes = Notifications::new();
        assert_eq!(list.phase(), &FetchPhase::Idle);

        let outcome = list.refresh(&api, &mut notes).await;

        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(list.phase(), &FetchPhase::Loaded);
        assert_eq!(list.roster().records(), page_one().as_slice());
        assert_eq!(list.pagination().total_pages(), 2);
        assert!(notes.latest().is_none());
        assert_eq!(api.requests(), vec!["GET /users?page=1"]);
    }

    #[tokio::test]
    async fn failed_page_keeps_previous_roster_but_moves_page() {
        let api = FakeDirectory::two_pages();
        api.fail_page(3);
        let mut list = ListController::new();
        let mut notes = Notifications::new();
        list.load(&api, 1, &mut notes).await.unwrap();

        let outcome = list.load(&api, 3, &mut notes).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(list.pagination().current_page(), 3);
        assert_eq!(list.roster().records(), page_one().as_slice());
        assert!(list.last_error().is_some());
        let note = notes.latest().unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.message, FETCH_FAILED);
    }

    #[tokio::test]
    async fn success_after_failure_resets_error() {
        let api = FakeDirectory::two_pages();
        api.fail_page(3);
        let mut list = ListController::new();
        let mut notes = Notifications::new();
        list.load(&api, 3, &mut notes).await.unwrap();
        assert!(list.last_error().is_some());

        list.load(&api, 2, &mut notes).await.unwrap();
        assert_eq!(list.last_error(), None);
        assert_eq!(list.roster().records(), page_two().as_slice());
    }

    #[test]
    fn late_response_for_superseded_page_is_discarded() {
        let mut list = ListController::new();
        let mut notes = Notifications::new();

        let first = list.set_page(1).unwrap();
        let second = list.set_page(2).unwrap();

        let outcome = list.apply(second, Ok(UserPage::new(page_two(), 2)), &mut notes);
        assert_eq!(outcome, FetchOutcome::Applied);

        let late = list.apply(first, Ok(UserPage::new(page_one(), 2)), &mut notes);
        assert_eq!(late, FetchOutcome::Discarded);
        assert_eq!(list.roster().records(), page_two().as_slice());
        assert_eq!(list.pagination().current_page(), 2);
    }

    #[test]
    fn late_response_arriving_first_is_also_discarded() {
        let mut list = ListController::new();
        let mut notes = Notifications::new();

        let first = list.set_page(1).unwrap();
        let second = list.set_page(2).unwrap();

        assert_eq!(
            list.apply(first, Err(DirectoryError::fetch(None, "boom")), &mut notes),
            FetchOutcome::Discarded
        );
        assert!(list.is_loading());
        assert!(notes.latest().is_none());

        list.apply(second, Ok(UserPage::new(page_two(), 2)), &mut notes);
        assert_eq!(list.phase(), &FetchPhase::Loaded);
    }

    #[test]
    fn same_page_refetch_supersedes_earlier_ticket() {
        let mut list = ListController::new();
        let mut notes = Notifications::new();

        let stale = list.mount();
        let fresh = list.mount();
        assert_eq!(stale.page(), fresh.page());

        assert_eq!(
            list.apply(stale, Ok(UserPage::new(page_one(), 1)), &mut notes),
            FetchOutcome::Discarded
        );
    }

    #[test]
    fn page_zero_is_rejected_without_a_fetch() {
        let mut list = ListController::new();
        assert!(list.set_page(0).is_err());
        assert_eq!(list.phase(), &FetchPhase::Idle);
        assert_eq!(list.pagination().current_page(), 1);
    }

    #[test]
    fn duplicate_ids_fail_the_fetch() {
        let mut list = ListController::new();
        let mut notes = Notifications::new();
        let ticket = list.mount();
        let dupes = vec![user(4, "Eve", "Holt"), user(4, "Eve", "Holt")];

        let outcome = list.apply(ticket, Ok(UserPage::new(dupes, 1)), &mut notes);

        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(list.roster().is_empty());
        assert!(matches!(list.last_error(), Some(DirectoryError::Fetch { .. })));
    }

    #[tokio::test]
    async fn search_filters_locally_and_hides_pagination() {
        let api = FakeDirectory::two_pages();
        let mut list = ListController::new();
        let mut notes = Notifications::new();
        list.refresh(&api, &mut notes).await;
        assert!(list.pagination_visible());
        assert_eq!(list.summary(), "3 users found");

        list.set_query("WEAV");

        assert_eq!(list.filtered().len(), 1);
        assert_eq!(list.filtered()[0].id, UserId::new(2));
        assert_eq!(list.summary(), "1 user found");
        assert!(!list.pagination_visible());
        assert_eq!(list.phase(), &FetchPhase::Loaded);
        assert_eq!(api.requests().len(), 1);

        list.clear_query();
        assert_eq!(list.filtered().len(), 3);
        assert!(list.pagination_visible());
    }

    #[test]
    fn empty_roster_hides_pagination() {
        let list = ListController::new();
        assert!(!list.pagination_visible());
        assert_eq!(list.summary(), "0 users found");
    }

    #[tokio::test]
    async fn delete_reconciliation_is_idempotent() {
        let api = FakeDirectory::two_pages();
        let mut list = ListController::new();
        let mut notes = Notifications::new();
        list.refresh(&api, &mut notes).await;

        assert!(list.reconcile_delete(UserId::new(1)));
        let once = list.roster().clone();
        assert!(!list.reconcile_delete(UserId::new(1)));
        assert_eq!(list.roster(), &once);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn page_of(page: u32) -> Vec<UserRecord> {
            let base = i64::from(page) * 10;
            vec![user(base + 1, "Page", "First"), user(base + 2, "Page", "Second")]
        }

        fn arb_fetches() -> impl Strategy<Value = (Vec<u32>, Vec<usize>)> {
            prop::collection::vec(1u32..6, 1..8).prop_flat_map(|pages| {
                let order: Vec<usize> = (0..pages.len()).collect();
                (Just(pages), Just(order).prop_shuffle())
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 300,
                ..ProptestConfig::default()
            })]

            /// Property: whatever order responses arrive in, only the last issued fetch lands.
            #[test]
            fn only_latest_fetch_is_applied((pages, order) in arb_fetches()) {
                let mut list = ListController::new();
                let mut notes = Notifications::new();
                let tickets: Vec<FetchTicket> =
                    pages.iter().map(|p| list.set_page(*p).unwrap()).collect();
                let last = tickets.len() - 1;

                for i in order {
                    let ticket = tickets[i];
                    let outcome = list.apply(ticket, Ok(UserPage::new(page_of(ticket.page()), 5)), &mut notes);
                    if i == last {
                        prop_assert_eq!(outcome, FetchOutcome::Applied);
                    } else {
                        prop_assert_eq!(outcome, FetchOutcome::Discarded);
                    }
                }

                let expected = page_of(pages[last]);
                prop_assert_eq!(list.roster().records(), expected.as_slice());
                prop_assert_eq!(list.pagination().current_page(), pages[last]);
                prop_assert_eq!(list.phase(), &FetchPhase::Loaded);
            }
        }
    }
}
