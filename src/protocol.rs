use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_NUM_NODES: u32 = 100;
pub const AGENT_LABEL: &str = "eval";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    pub seed: u64,
    pub num_nodes: u32,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_payload: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_agent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
}

/// Caller-side description of an agent to create.
///
/// Unset options are left out of the request. A missing seed is drawn from
/// the client's [`SeedSource`](crate::seed::SeedSource).
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub name: String,
    pub seed: Option<u64>,
    pub num_nodes: u32,
    pub public_url: Option<String>,
    pub advanced_payload: Option<Map<String, Value>>,
    pub parent_agent_id: Option<String>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: None,
            num_nodes: DEFAULT_NUM_NODES,
            public_url: None,
            advanced_payload: None,
            parent_agent_id: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_num_nodes(mut self, num_nodes: u32) -> Self {
        self.num_nodes = num_nodes;
        self
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    pub fn with_advanced_payload(mut self, payload: Map<String, Value>) -> Self {
        self.advanced_payload = Some(payload);
        self
    }

    pub fn with_parent_agent_id(mut self, id: impl Into<String>) -> Self {
        self.parent_agent_id = Some(id.into());
        self
    }

    pub(crate) fn into_request(self, default_seed: impl FnOnce() -> u64) -> CreateAgentRequest {
        CreateAgentRequest {
            name: self.name,
            seed: self.seed.unwrap_or_else(default_seed),
            num_nodes: self.num_nodes,
            label: AGENT_LABEL.to_string(),
            public_url: self.public_url,
            advanced_payload: self.advanced_payload,
            parent_agent_id: self.parent_agent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_agent_omits_optional_fields() {
        let req = AgentSpec::new("support-bot").into_request(|| 7);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "name": "support-bot", "seed": 7, "numNodes": 100, "label": "eval" })
        );
    }

    #[test]
    fn explicit_seed_is_not_replaced() {
        let req = AgentSpec::new("a")
            .with_seed(12)
            .into_request(|| panic!("seed source should not be consulted"));
        assert_eq!(req.seed, 12);
    }

    #[test]
    fn full_agent_serializes_camel_case() {
        let mut advanced = Map::new();
        advanced.insert("persona".into(), json!("terse"));

        let req = AgentSpec::new("a")
            .with_seed(3)
            .with_num_nodes(250)
            .with_public_url("https://agent.example.com")
            .with_advanced_payload(advanced)
            .with_parent_agent_id("parent-1")
            .into_request(|| 0);

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "name": "a",
                "seed": 3,
                "numNodes": 250,
                "label": "eval",
                "publicUrl": "https://agent.example.com",
                "advancedPayload": { "persona": "terse" },
                "parentAgentId": "parent-1"
            })
        );
    }

    #[test]
    fn evaluate_omits_missing_expected_answer() {
        let bare = EvaluateRequest {
            question: "What is 2+2?".into(),
            expected_answer: None,
        };
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({ "question": "What is 2+2?" })
        );

        let with_answer = EvaluateRequest {
            question: "What is 2+2?".into(),
            expected_answer: Some("4".into()),
        };
        assert_eq!(
            serde_json::to_value(&with_answer).unwrap(),
            json!({ "question": "What is 2+2?", "expectedAnswer": "4" })
        );
    }
}
