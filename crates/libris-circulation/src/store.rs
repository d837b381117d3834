//! SQLite adapters: the libris-db repositories behind the store ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libris_core::{Book, BookUpdate, Issue, Member, MemberUpdate, Money, NewBook, NewIssue, NewMember};
use libris_db::{BookRepository, DbResult, IssueRepository, MemberRepository};

use crate::ports::{CatalogStore, IssueLedger, MembershipStore};

#[async_trait]
impl CatalogStore for BookRepository {
    async fn create(&self, book: &NewBook) -> DbResult<Book> {
        BookRepository::create(self, book).await
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        BookRepository::get_by_id(self, id).await
    }

    async fn list(&self) -> DbResult<Vec<Book>> {
        BookRepository::list(self).await
    }

    async fn search(&self, query: &str) -> DbResult<Vec<Book>> {
        BookRepository::search(self, query).await
    }

    async fn update(&self, id: i64, update: &BookUpdate) -> DbResult<Book> {
        BookRepository::update(self, id, update).await
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        BookRepository::delete(self, id).await
    }

    async fn change_availability(&self, id: i64, delta: i64) -> DbResult<bool> {
        BookRepository::change_availability(self, id, delta).await
    }

    async fn reconcile_availability(&self, id: i64) -> DbResult<Option<Book>> {
        BookRepository::reconcile_availability(self, id).await
    }
}

#[async_trait]
impl MembershipStore for MemberRepository {
    async fn create(&self, member: &NewMember) -> DbResult<Member> {
        MemberRepository::create(self, member).await
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Member>> {
        MemberRepository::get_by_id(self, id).await
    }

    async fn list(&self) -> DbResult<Vec<Member>> {
        MemberRepository::list(self).await
    }

    async fn update(&self, id: i64, update: &MemberUpdate) -> DbResult<Member> {
        MemberRepository::update(self, id, update).await
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        MemberRepository::delete(self, id).await
    }
}

#[async_trait]
impl IssueLedger for IssueRepository {
    async fn create(&self, issue: &NewIssue) -> DbResult<i64> {
        IssueRepository::create(self, issue).await
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Issue>> {
        IssueRepository::get_by_id(self, id).await
    }

    async fn get_by_member(&self, member_id: i64) -> DbResult<Vec<Issue>> {
        IssueRepository::get_by_member(self, member_id).await
    }

    async fn get_active_by_book_and_member(
        &self,
        book_id: i64,
        member_id: i64,
    ) -> DbResult<Option<Issue>> {
        IssueRepository::get_active_by_book_and_member(self, book_id, member_id).await
    }

    async fn mark_returned(
        &self,
        issue_id: i64,
        returned_at: DateTime<Utc>,
        fine: Money,
    ) -> DbResult<bool> {
        IssueRepository::mark_returned(self, issue_id, returned_at, fine).await
    }
}
