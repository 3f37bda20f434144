use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// One row of the backend's saved-token listing. Rows also carry the
/// auth token itself, but only the derived credential is displayed.
#[derive(Deserialize)]
pub struct TokenRow {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Fetches the most recently saved auth token. `None` means the request
/// failed; a missing `token` field comes back as an empty string.
pub async fn fetch_latest_token(client: &Client, base_url: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct LatestTokenResponse {
        #[serde(default)]
        token: Option<String>,
    }

    match client.get(format!("{}/save-token", base_url)).send().await {
        Ok(response) if response.status().is_success() => {
            let parsed: LatestTokenResponse = response.json().await.ok()?;
            Some(parsed.token.unwrap_or_default())
        }
        Ok(response) => {
            println!(
                "Failed to fetch latest token: Status: {}, Body: {:?}",
                response.status(),
                response.text().await
            );
            None
        }
        Err(err) => {
            println!("Error fetching latest token: {:?}", err);
            None
        }
    }
}

/// Fetches every saved token row. Ordering is whatever the backend
/// returns; callers read index 0 as the newest.
pub async fn fetch_all_tokens(client: &Client, base_url: &str) -> Option<Vec<TokenRow>> {
    #[derive(Deserialize)]
    struct AllTokensResponse {
        #[serde(default)]
        tokens: Vec<TokenRow>,
    }

    let mut url = Url::parse(&format!("{}/save-token", base_url)).ok()?;
    url.query_pairs_mut().append_pair("all", "true");

    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            let parsed: AllTokensResponse = response.json().await.ok()?;
            Some(parsed.tokens)
        }
        Ok(response) => {
            println!(
                "Failed to fetch saved tokens: Status: {}, Body: {:?}",
                response.status(),
                response.text().await
            );
            None
        }
        Err(err) => {
            println!("Error fetching saved tokens: {:?}", err);
            None
        }
    }
}

/// Asks the backend whether `token` is valid. Any failure reads as
/// invalid; callers cannot tell a rejection from a transport error.
pub async fn verify_token(client: &Client, base_url: &str, token: &str) -> bool {
    #[derive(Serialize)]
    struct VerifyRequest {
        token: String,
    }

    #[derive(Deserialize)]
    struct VerifyResponse {
        #[serde(default)]
        valid: bool,
    }

    let request = VerifyRequest {
        token: token.to_string(),
    };

    match client
        .post(format!("{}/verify-token", base_url))
        .json(&request)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => response
            .json::<VerifyResponse>()
            .await
            .map(|parsed| parsed.valid)
            .unwrap_or(false),
        Ok(response) => {
            println!("Token verification rejected: {:?}", response.text().await);
            false
        }
        Err(err) => {
            println!("Error verifying token: {:?}", err);
            false
        }
    }
}

/// Saves `token` as the current auth token. The response body is ignored.
pub async fn save_token(client: &Client, base_url: &str, token: &str) -> bool {
    #[derive(Serialize)]
    struct SaveRequest {
        token: String,
    }

    let request = SaveRequest {
        token: token.to_string(),
    };

    match client
        .post(format!("{}/save-token", base_url))
        .json(&request)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            println!("Failed to save token: {:?}", response.text().await);
            false
        }
        Err(err) => {
            println!("Error saving token: {:?}", err);
            false
        }
    }
}

/// Fetches the derived access token ("sub") for the saved auth token.
pub async fn fetch_access_token(client: &Client, base_url: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct AccessTokenResponse {
        #[serde(default)]
        access_token: String,
    }

    match client.get(format!("{}/access-token", base_url)).send().await {
        Ok(response) if response.status().is_success() => {
            let parsed: AccessTokenResponse = response.json().await.ok()?;
            Some(parsed.access_token)
        }
        Ok(response) => {
            println!("Failed to fetch access token: {:?}", response.text().await);
            None
        }
        Err(err) => {
            println!("Error fetching access token: {:?}", err);
            None
        }
    }
}

/// Publishes `text` through the backend. The response body is ignored.
pub async fn post_to_linkedin(client: &Client, base_url: &str, text: &str) -> bool {
    #[derive(Serialize)]
    struct PostRequest {
        text: String,
    }

    let request = PostRequest {
        text: text.to_string(),
    };

    match client
        .post(format!("{}/post-to-linkedin", base_url))
        .json(&request)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            println!("Failed to post: {:?}", response.text().await);
            false
        }
        Err(err) => {
            println!("Error posting: {:?}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn latest_token_defaults_missing_field_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/save-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = Client::new();
        let token = fetch_latest_token(&client, &server.uri()).await;
        assert_eq!(token, Some(String::new()));
    }

    #[tokio::test]
    async fn latest_token_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/save-token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Client::new();
        assert_eq!(fetch_latest_token(&client, &server.uri()).await, None);
    }

    #[tokio::test]
    async fn all_tokens_request_carries_query_param() {
        let server = MockServer::start().await;
        // Only the query-parameterized form is mounted, so a request
        // without all=true would come back 404 and read as a failure.
        Mock::given(method("GET"))
            .and(path("/save-token"))
            .and(query_param("all", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tokens": [
                    { "token": "new", "access_token": "sub-new" },
                    { "token": "old", "access_token": "sub-old" }
                ]
            })))
            .mount(&server)
            .await;

        let client = Client::new();
        let rows = fetch_all_tokens(&client, &server.uri()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].access_token.as_deref(), Some("sub-new"));
    }

    #[tokio::test]
    async fn latest_token_request_carries_no_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/save-token"))
            .and(query_param_is_missing("all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
            .mount(&server)
            .await;

        let client = Client::new();
        assert_eq!(
            fetch_latest_token(&client, &server.uri()).await.as_deref(),
            Some("abc")
        );
    }

    #[tokio::test]
    async fn verify_reports_backend_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify-token"))
            .and(body_json(json!({ "token": "good" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": true })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/verify-token"))
            .and(body_json(json!({ "token": "bad" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": false })))
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(verify_token(&client, &server.uri(), "good").await);
        assert!(!verify_token(&client, &server.uri(), "bad").await);
    }

    #[tokio::test]
    async fn verify_server_error_reads_as_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify-token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(!verify_token(&client, &server.uri(), "whatever").await);
    }

    #[tokio::test]
    async fn save_posts_token_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/save-token"))
            .and(body_json(json!({ "token": "abc" })))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(save_token(&client, &server.uri(), "abc").await);
        assert!(!save_token(&client, &server.uri(), "other").await);
    }

    #[tokio::test]
    async fn access_token_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "sub-1"
            })))
            .mount(&server)
            .await;

        let client = Client::new();
        assert_eq!(
            fetch_access_token(&client, &server.uri()).await.as_deref(),
            Some("sub-1")
        );
    }

    #[tokio::test]
    async fn post_sends_text_and_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post-to-linkedin"))
            .and(body_json(json!({ "text": "hello" })))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(post_to_linkedin(&client, &server.uri(), "hello").await);
        // Unmatched body -> 404 -> failure.
        assert!(!post_to_linkedin(&client, &server.uri(), "nope").await);
    }
}
