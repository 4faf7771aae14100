//! Cantabular GraphQL client for census county categories.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::translate_county_name;
use crate::error::CensusError;

const USER_AGENT: &str = "townlands/0.1 (Irish census boundary fetcher)";

/// Dataset and variable whose categories enumerate the counties
#[derive(Debug, Clone)]
pub struct CountyVariable {
    pub dataset: String,
    pub variable: String,
}

impl Default for CountyVariable {
    fn default() -> Self {
        Self {
            dataset: "Ireland-1911-no-SDC".to_string(),
            variable: "county_geoid".to_string(),
        }
    }
}

impl CountyVariable {
    fn graphql_query(&self) -> String {
        format!(
            r#"
query VariableCategories {{
  dataset(name: "{dataset}") {{
    variables(names: ["{variable}"]) {{
      edges {{
        node {{
          categories {{
            edges {{
              node {{
                code
                label
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}
"#,
            dataset = self.dataset,
            variable = self.variable
        )
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    dataset: Option<Dataset>,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    variables: Connection<Variable>,
}

#[derive(Debug, Deserialize)]
struct Variable {
    categories: Connection<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    label: String,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

/// Extract raw category labels from a GraphQL response body.
///
/// A response with `errors` fails with the first error's message.
pub fn parse_category_labels(body: &[u8]) -> Result<Vec<String>, CensusError> {
    let response: GraphQlResponse =
        serde_json::from_slice(body).map_err(|e| CensusError::Shape(e.to_string()))?;

    if let Some(error) = response.errors.into_iter().next() {
        return Err(CensusError::GraphQl(error.message));
    }

    let dataset = response
        .data
        .and_then(|d| d.dataset)
        .ok_or_else(|| CensusError::Shape("missing data.dataset".to_string()))?;

    let variable = dataset
        .variables
        .edges
        .into_iter()
        .next()
        .ok_or_else(|| CensusError::Shape("dataset has no variables".to_string()))?;

    Ok(variable
        .node
        .categories
        .edges
        .into_iter()
        .map(|e| e.node.label)
        .collect())
}

/// Client for the census metadata GraphQL endpoint
pub struct CensusClient {
    client: Client,
    endpoint: String,
    variable: CountyVariable,
}

impl CensusClient {
    pub fn new(endpoint: &str, variable: CountyVariable, timeout: Duration) -> Result<Self, CensusError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            variable,
        })
    }

    /// Fetch every county category and translate it to an OSM area name
    pub async fn county_names(&self) -> Result<Vec<String>, CensusError> {
        info!(
            "Getting county names from {} ({})",
            self.endpoint, self.variable.dataset
        );

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("query", &self.variable.graphql_query())
            .finish();

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CensusError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        let labels = parse_category_labels(&bytes)?;
        debug!("Census labels: {:?}", labels);

        let names: Vec<String> = labels.iter().map(|l| translate_county_name(l)).collect();
        info!("Found {} counties", names.len());

        Ok(names)
    }
}
