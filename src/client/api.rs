use crate::client::ClientError;
use crate::config::ClientConfig;
use crate::models::{
    CreatePersonRequest, ErrorResponse, Person, PresenceRequest, SpinResult, UpdatePersonRequest,
    Winner,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Remote roster store. Every call either returns the canonical record(s)
/// from the store or fails without side effects on the caller.
#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn list_persons(&self) -> Result<Vec<Person>, ClientError>;
    async fn create_person(&self, name: &str) -> Result<Person, ClientError>;
    async fn update_person(
        &self,
        id: i64,
        update: &UpdatePersonRequest,
    ) -> Result<Person, ClientError>;
    async fn delete_person(&self, id: i64) -> Result<(), ClientError>;
    async fn set_presence(&self, id: i64, present: bool) -> Result<Person, ClientError>;
    async fn set_all_presence(&self, present: bool) -> Result<(), ClientError>;
    async fn reset_person_wins(&self, id: i64) -> Result<Person, ClientError>;
    async fn spin(&self) -> Result<SpinResult, ClientError>;
    async fn win_history(&self) -> Result<Vec<Winner>, ClientError>;
    async fn reset_all_wins(&self) -> Result<(), ClientError>;
}

/// `RosterApi` over the REST endpoints served by this crate.
#[derive(Clone)]
pub struct HttpRosterApi {
    http: Client,
    base_url: String,
}

impl HttpRosterApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent("roulette-backend/client")
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn failure(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.error);
    log::warn!("Roster API returned {status}: {message:?}");
    ClientError::Status { status, message }
}

async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(failure(response).await);
    }
    Ok(response.json().await?)
}

async fn empty_body(response: Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(failure(response).await);
    }
    Ok(())
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn list_persons(&self) -> Result<Vec<Person>, ClientError> {
        let response = self.http.get(self.url("/persons")).send().await?;
        json_body(response).await
    }

    async fn create_person(&self, name: &str) -> Result<Person, ClientError> {
        let body = CreatePersonRequest {
            name: name.to_string(),
        };
        let response = self
            .http
            .post(self.url("/persons"))
            .json(&body)
            .send()
            .await?;
        json_body(response).await
    }

    async fn update_person(
        &self,
        id: i64,
        update: &UpdatePersonRequest,
    ) -> Result<Person, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/persons/{id}")))
            .json(update)
            .send()
            .await?;
        json_body(response).await
    }

    async fn delete_person(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/persons/{id}")))
            .send()
            .await?;
        empty_body(response).await
    }

    async fn set_presence(&self, id: i64, present: bool) -> Result<Person, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/persons/{id}/presence")))
            .json(&PresenceRequest { present })
            .send()
            .await?;
        json_body(response).await
    }

    async fn set_all_presence(&self, present: bool) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/persons/presence"))
            .json(&PresenceRequest { present })
            .send()
            .await?;
        empty_body(response).await
    }

    async fn reset_person_wins(&self, id: i64) -> Result<Person, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/persons/{id}/reset-wins")))
            .send()
            .await?;
        json_body(response).await
    }

    async fn spin(&self) -> Result<SpinResult, ClientError> {
        let response = self.http.post(self.url("/roulette/spin")).send().await?;
        json_body(response).await
    }

    async fn win_history(&self) -> Result<Vec<Winner>, ClientError> {
        let response = self.http.get(self.url("/roulette/history")).send().await?;
        json_body(response).await
    }

    async fn reset_all_wins(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/roulette/reset")).send().await?;
        empty_body(response).await
    }
}
