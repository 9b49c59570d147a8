use {
    crate::{
        api::{ApiResponse, ResponseMeta, SentryHttpClient, SentryResult},
        project_keys::{CreateProjectKeyParams, ProjectKey, UpdateProjectKeyParams},
    },
    async_trait::async_trait,
    reqwest::Method,
    std::fmt::Debug,
    url::Url,
};

/// Project key operations of the Sentry API.
///
/// Every call issues exactly one request against
/// `0/projects/{organization_slug}/{project_slug}/keys/`.
#[async_trait]
pub trait ProjectKeysClient: 'static + Send + Sync + Debug {
    async fn list(
        &self,
        organization_slug: &str,
        project_slug: &str,
    ) -> SentryResult<ApiResponse<Vec<ProjectKey>>>;

    async fn get(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
    ) -> SentryResult<ApiResponse<ProjectKey>>;

    async fn create(
        &self,
        organization_slug: &str,
        project_slug: &str,
        params: &CreateProjectKeyParams,
    ) -> SentryResult<ApiResponse<ProjectKey>>;

    async fn update(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
        params: &UpdateProjectKeyParams,
    ) -> SentryResult<ApiResponse<ProjectKey>>;

    /// Succeeds on any 2xx status. The response body is not read.
    async fn delete(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
    ) -> SentryResult<ResponseMeta>;
}

#[derive(Debug, Clone)]
pub struct ProjectKeysService {
    client: SentryHttpClient,
}

impl ProjectKeysService {
    pub fn new(client: SentryHttpClient) -> Self {
        Self { client }
    }

    fn keys_url(&self, organization_slug: &str, project_slug: &str) -> SentryResult<Url> {
        self.client
            .endpoint(["0", "projects", organization_slug, project_slug, "keys"])
    }

    fn key_url(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
    ) -> SentryResult<Url> {
        self.client.endpoint([
            "0",
            "projects",
            organization_slug,
            project_slug,
            "keys",
            key_id,
        ])
    }
}

#[async_trait]
impl ProjectKeysClient for ProjectKeysService {
    async fn list(
        &self,
        organization_slug: &str,
        project_slug: &str,
    ) -> SentryResult<ApiResponse<Vec<ProjectKey>>> {
        let url = self.keys_url(organization_slug, project_slug)?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn get(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
    ) -> SentryResult<ApiResponse<ProjectKey>> {
        let url = self.key_url(organization_slug, project_slug, key_id)?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn create(
        &self,
        organization_slug: &str,
        project_slug: &str,
        params: &CreateProjectKeyParams,
    ) -> SentryResult<ApiResponse<ProjectKey>> {
        let url = self.keys_url(organization_slug, project_slug)?;
        self.client
            .send_json(self.client.request(Method::POST, url).json(params))
            .await
    }

    async fn update(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
        params: &UpdateProjectKeyParams,
    ) -> SentryResult<ApiResponse<ProjectKey>> {
        let url = self.key_url(organization_slug, project_slug, key_id)?;
        self.client
            .send_json(self.client.request(Method::PUT, url).json(params))
            .await
    }

    async fn delete(
        &self,
        organization_slug: &str,
        project_slug: &str,
        key_id: &str,
    ) -> SentryResult<ResponseMeta> {
        let url = self.key_url(organization_slug, project_slug, key_id)?;
        self.client
            .send_empty(self.client.request(Method::DELETE, url))
            .await
    }
}
