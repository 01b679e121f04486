use http::header;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    error::{Error, Result, UpstreamError},
    oauth::AccessToken,
};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Client is a wrapper around `reqwest::Client` which provides automatically
/// prepending the base url and attaching the bearer token of the request.
#[derive(Debug, Clone)]
pub(crate) struct Client {
    base_url: Url,
    inner: reqwest::Client,
}

pub(crate) enum Body {
    Empty,
    Form(Vec<(&'static str, String)>),
}

impl Client {
    /// Creates a new client. Request paths are resolved against `base_url`
    /// with [`Url::join`], so a base path must end with a slash to be kept.
    /// Requests have no timeout.
    pub(crate) fn new<U>(base_url: U) -> Result<Self>
    where
        U: AsRef<str>,
    {
        let base_url = Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::HttpClientSetup)?;

        Ok(Self {
            base_url,
            inner: http_client,
        })
    }

    async fn execute<P>(
        &self,
        method: http::Method,
        path: P,
        body: Body,
        token: Option<&AccessToken>,
    ) -> Result<Response>
    where
        P: AsRef<str>,
    {
        let url = self
            .base_url
            .join(path.as_ref().trim_start_matches('/'))
            .map_err(Error::InvalidUrl)?;

        let mut req = self.inner.request(method.clone(), url);
        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token.secret()))
                .map_err(|_e| Error::InvalidToken)?;
            req = req.header(header::AUTHORIZATION, value);
        }
        match body {
            Body::Empty => {}
            Body::Form(fields) => req = req.form(&fields),
        }

        let res = req.send().await.map_err(Error::Http)?;
        Ok(Response::new(res, method, path.as_ref().to_string()))
    }

    pub(crate) async fn get<S>(&self, path: S, token: &AccessToken) -> Result<Response>
    where
        S: AsRef<str>,
    {
        self.execute(http::Method::GET, path, Body::Empty, Some(token))
            .await
    }

    /// Like [`Client::get`], but encodes `params` as the query string.
    pub(crate) async fn get_with_query<S, Q>(
        &self,
        path: S,
        params: &Q,
        token: &AccessToken,
    ) -> Result<Response>
    where
        S: AsRef<str>,
        Q: Serialize,
    {
        let query_string = serde_qs::to_string(params)?;
        self.get(format!("{}?{query_string}", path.as_ref()), token)
            .await
    }

    pub(crate) async fn post_form<S>(
        &self,
        path: S,
        fields: Vec<(&'static str, String)>,
    ) -> Result<Response>
    where
        S: AsRef<str>,
    {
        self.execute(http::Method::POST, path, Body::Form(fields), None)
            .await
    }

    pub(crate) async fn delete<S>(&self, path: S, token: &AccessToken) -> Result<Response>
    where
        S: AsRef<str>,
    {
        self.execute(http::Method::DELETE, path, Body::Empty, Some(token))
            .await
    }
}

#[derive(Debug)]
pub(crate) struct Response {
    inner: reqwest::Response,
    method: http::Method,
    path: String,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response, method: http::Method, path: String) -> Self {
        Self {
            inner,
            method,
            path,
        }
    }

    pub(crate) async fn json<T: DeserializeOwned>(self) -> Result<T> {
        self.inner.json::<T>().await.map_err(Error::Deserialize)
    }

    /// Turns a non-success status into an [`UpstreamError`] carrying the
    /// response body text.
    pub(crate) async fn check_error(self) -> std::result::Result<Response, UpstreamError> {
        let status = self.inner.status();
        if !status.is_success() {
            // The body is diagnostic only, an unreadable one is reported empty
            let body = self.inner.text().await.unwrap_or_default();
            return Err(UpstreamError {
                status: status.as_u16(),
                method: self.method,
                path: self.path,
                body,
            });
        }

        Ok(self)
    }
}

#[cfg(test)]
mod test {
    use httpmock::prelude::*;

    use super::Client;
    use crate::oauth::AccessToken;

    #[tokio::test]
    async fn test_bearer_header_is_attached() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/admin/directory/v1/users")
                    .header("authorization", "Bearer ya29.token");
                then.status(200).body("{}");
            })
            .await;

        let client = Client::new(server.base_url())?;
        let token = AccessToken::new("ya29.token");
        let res = client.get("/admin/directory/v1/users", &token).await?;
        assert!(res.check_error().await.is_ok());

        mock.assert_hits_async(1).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_check_error_keeps_body() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/admin/directory/v1/users/gone");
                then.status(404).body("Resource Not Found: userKey");
            })
            .await;

        let client = Client::new(server.base_url())?;
        let token = AccessToken::new("ya29.token");
        let res = client
            .delete("/admin/directory/v1/users/gone", &token)
            .await?;

        match res.check_error().await {
            Err(e) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.method, http::Method::DELETE);
                assert_eq!(e.body, "Resource Not Found: userKey");
            }
            Ok(res) => panic!("Expected upstream error, got {:?}", res),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_token_characters_are_rejected() {
        let client = Client::new("https://admin.googleapis.com").unwrap();
        let token = AccessToken::new("bad\ntoken");
        let rt = tokio::runtime::Runtime::new().unwrap();

        match rt.block_on(client.get("/admin/directory/v1/users", &token)) {
            Err(crate::Error::InvalidToken) => {}
            res => panic!("Expected invalid token error, got {:?}", res),
        }
    }
}
