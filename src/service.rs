use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    serde_json::json,
    tool, tool_handler, tool_router,
};

use crate::config::OpenDataConfig;
use crate::github::{
    GetUserRequest, ListCommitsRequest, ListIssuesRequest, ListReposRequest, RepoInfoRequest,
    SearchReposRequest,
};
use crate::rail::{StationNameToCodeRequest, TrainScheduleRequest, TrainsAtStationRequest};
use crate::upstream::UpstreamClient;
use crate::weather::{GetAlertsRequest, GetForecastRequest};
use crate::{github, rail, weather};

#[derive(Clone)]
pub struct OpenDataService {
    tool_router: ToolRouter<Self>,
    config: OpenDataConfig,
    upstream: UpstreamClient,
}

impl OpenDataService {
    pub fn new(config: OpenDataConfig) -> Result<Self, ErrorData> {
        let upstream = UpstreamClient::new(&config).map_err(|e| {
            ErrorData::internal_error(
                "Error: upstream: client build failed",
                Some(json!({"reason": e.to_string()})),
            )
        })?;

        Ok(Self {
            tool_router: Self::tool_router(),
            config,
            upstream,
        })
    }
}

#[tool_router]
impl OpenDataService {
    #[tool(description = "Get active weather alerts for a US state")]
    pub async fn get_alerts(
        &self,
        Parameters(request): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            weather::alerts(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "Get the weather forecast for a latitude/longitude location")]
    pub async fn get_forecast(
        &self,
        Parameters(request): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            weather::forecast(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "Get public GitHub profile information for a user")]
    pub async fn get_github_user(
        &self,
        Parameters(request): Parameters<GetUserRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            github::user(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "List public GitHub repositories for a user, most recently updated first")]
    pub async fn get_github_repos(
        &self,
        Parameters(request): Parameters<ListReposRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            github::repos(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "Get detailed information about a public GitHub repository")]
    pub async fn get_github_repo_info(
        &self,
        Parameters(request): Parameters<RepoInfoRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            github::repo_info(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "Search public GitHub repositories, ordered by stars")]
    pub async fn search_github_repos(
        &self,
        Parameters(request): Parameters<SearchReposRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            github::search_repos(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "List issues for a public GitHub repository")]
    pub async fn get_github_issues(
        &self,
        Parameters(request): Parameters<ListIssuesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            github::issues(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "List recent commits for a public GitHub repository")]
    pub async fn get_github_commits(
        &self,
        Parameters(request): Parameters<ListCommitsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            github::commits(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "Convert an Indian Rail station name to its station code")]
    pub async fn station_name_to_code(
        &self,
        Parameters(request): Parameters<StationNameToCodeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            rail::station_name_to_code(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "Get the station-by-station schedule of an Indian Rail train")]
    pub async fn get_train_schedule_indian_rail(
        &self,
        Parameters(request): Parameters<TrainScheduleRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            rail::train_schedule(&self.upstream, &self.config, request).await,
        ))
    }

    #[tool(description = "List trains arriving at or departing from an Indian Rail station")]
    pub async fn get_all_trains_on_station(
        &self,
        Parameters(request): Parameters<TrainsAtStationRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            rail::trains_at_station(&self.upstream, &self.config, request).await,
        ))
    }
}

#[tool_handler]
impl ServerHandler for OpenDataService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Read-only data-fetch MCP server: US weather alerts and forecasts (NWS), \
                 public GitHub metadata, and Indian Rail schedules. All tools return a \
                 plain-text summary; failures are reported as text, never as protocol errors."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_CRATE_NAME").to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: None,
        is_error: Some(false),
        meta: None,
    }
}
