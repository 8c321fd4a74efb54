//! # Wanted-Request Endpoints
//!
//! Listing, detail, CRUD, comments, favorites and reports for "wanted"
//! requests (a buyer posting what they are looking for).

use shared::{
    ContactInfo, MessageResponse, NewComment, NewRequestItem, PageQuery, Paginated, ReportRequest, RequestComment,
    RequestItem, RequestItemUpdate, RequestQuery,
};

use super::client::{segment, ApiClient};
use crate::core::error::Result;
use crate::services::http::ApiRequest;

impl ApiClient {
    /// Paginated listing with optional filters.
    pub async fn get_requests(&self, query: Option<&RequestQuery>) -> Result<Paginated<RequestItem>> {
        self.http.execute(ApiRequest::get("/requests").query(&query)?).await
    }

    pub async fn get_request_detail(&self, id: &str) -> Result<RequestItem> {
        self.http
            .execute(ApiRequest::get(format!("/requests/{}", segment(id))))
            .await
    }

    pub async fn like_comment(&self, comment_id: &str) -> Result<MessageResponse> {
        self.http
            .execute(ApiRequest::post(format!("/request-comments/{}/like", segment(comment_id))))
            .await
    }

    pub async fn get_related_requests(&self, id: &str, page: Option<PageQuery>) -> Result<Paginated<RequestItem>> {
        let request = ApiRequest::get(format!("/requests/{}/related", segment(id))).query(&page)?;
        self.http.execute(request).await
    }

    pub async fn report_request(&self, id: &str, report: &ReportRequest) -> Result<MessageResponse> {
        let request = ApiRequest::post(format!("/requests/{}/report", segment(id))).json(report)?;
        self.http.execute(request).await
    }

    pub async fn get_contact_info(&self, id: &str) -> Result<ContactInfo> {
        self.http
            .execute(ApiRequest::get(format!("/requests/{}/contact", segment(id))))
            .await
    }

    pub async fn get_comments(&self, id: &str, page: Option<PageQuery>) -> Result<Paginated<RequestComment>> {
        let request = ApiRequest::get(format!("/requests/{}/comments", segment(id))).query(&page)?;
        self.http.execute(request).await
    }

    pub async fn submit_comment(&self, id: &str, comment: &NewComment) -> Result<RequestComment> {
        let request = ApiRequest::post(format!("/requests/{}/comments", segment(id))).json(comment)?;
        self.http.execute(request).await
    }

    #[tracing::instrument(skip(self, data), fields(title = %data.title))]
    pub async fn create_request(&self, data: &NewRequestItem) -> Result<RequestItem> {
        let created: RequestItem = self.http.execute(ApiRequest::post("/requests").json(data)?).await?;
        tracing::info!(request_id = %created.id, "Request created");
        Ok(created)
    }

    pub async fn update_request(&self, id: &str, update: &RequestItemUpdate) -> Result<RequestItem> {
        let request = ApiRequest::put(format!("/requests/{}", segment(id))).json(update)?;
        self.http.execute(request).await
    }

    pub async fn delete_request(&self, id: &str) -> Result<MessageResponse> {
        self.http
            .execute(ApiRequest::delete(format!("/requests/{}", segment(id))))
            .await
    }

    /// Requests posted by the logged-in user.
    pub async fn get_my_requests(&self, query: Option<&RequestQuery>) -> Result<Paginated<RequestItem>> {
        self.http.execute(ApiRequest::get("/requests/my").query(&query)?).await
    }

    pub async fn favorite_request(&self, id: &str) -> Result<MessageResponse> {
        self.http
            .execute(ApiRequest::post(format!("/requests/{}/favorite", segment(id))))
            .await
    }

    pub async fn unfavorite_request(&self, id: &str) -> Result<MessageResponse> {
        self.http
            .execute(ApiRequest::delete(format!("/requests/{}/favorite", segment(id))))
            .await
    }

    pub async fn get_favorite_requests(&self, query: Option<&RequestQuery>) -> Result<Paginated<RequestItem>> {
        self.http
            .execute(ApiRequest::get("/requests/favorites").query(&query)?)
            .await
    }

    /// Bump the view counter.
    pub async fn view_request(&self, id: &str) -> Result<MessageResponse> {
        self.http
            .execute(ApiRequest::post(format!("/requests/{}/view", segment(id))))
            .await
    }

    /// Full-text search. `keyword` is sent as `q`, after any other filters.
    pub async fn search_requests(&self, keyword: &str, query: Option<&RequestQuery>) -> Result<Paginated<RequestItem>> {
        let request = ApiRequest::get("/requests/search").query(&query)?.query_pair("q", keyword);
        self.http.execute(request).await
    }
}
