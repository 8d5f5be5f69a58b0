#![deny(missing_docs)]

//! # Prompts
//!
//! Builds the system instruction and the per-request user messages sent to
//! the generation service.

use crate::oas::models::{Endpoint, Specification};

/// System instruction shared by every request.
pub const SYSTEM_PROMPT: &str = "You are a senior technical writer specializing in API documentation.

Your task is to write clear, accurate, and developer-friendly API documentation in Markdown format.

Guidelines:
- Write for developers who are integrating with this API for the first time
- Include a concise description of what the endpoint does and when to use it
- Provide realistic, domain-appropriate request and response examples; never use placeholder values like \"foo\", \"bar\", \"example\", \"test\", or \"string\"
- Cover common error codes and explain how a developer should handle them
- Add practical tips where relevant (e.g. pagination, rate limits, required headers)
- Keep the tone clear and direct
- Output only Markdown: no preamble, no commentary outside the documentation itself
";

/// Builds the user message asking for one endpoint's documentation.
pub fn build_endpoint_prompt(endpoint: &Endpoint) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Document the following API endpoint:\n".to_string());
    lines.push(format!("**Method:** {}", endpoint.method));
    lines.push(format!("**Path:** {}", endpoint.path));

    if let Some(op_id) = &endpoint.operation_id {
        lines.push(format!("**Operation ID:** {}", op_id));
    }
    if let Some(summary) = &endpoint.summary {
        lines.push(format!("**Summary:** {}", summary));
    }
    if let Some(description) = &endpoint.description {
        lines.push(format!("**Description:** {}", description));
    }
    if !endpoint.tags.is_empty() {
        lines.push(format!("**Tags:** {}", endpoint.tags.join(", ")));
    }

    if !endpoint.parameters.is_empty() {
        lines.push("\n**Parameters:**".to_string());
        for param in &endpoint.parameters {
            let required = if param.required { "required" } else { "optional" };
            let schema_type = match &param.format {
                Some(format) => format!("{} ({})", param.schema_type, format),
                None => param.schema_type.clone(),
            };
            let desc = param
                .description
                .as_ref()
                .map(|d| format!(" - {}", d))
                .unwrap_or_default();

            let mut extras = Vec::new();
            if !param.enum_values.is_empty() {
                extras.push(format!("allowed values: {}", param.enum_values.join(", ")));
            }
            if let Some(example) = &param.example {
                extras.push(format!("example: {}", example));
            }
            let extras = if extras.is_empty() {
                String::new()
            } else {
                format!(" [{}]", extras.join("; "))
            };

            lines.push(format!(
                "- `{}` ({}, {}, {}){}{}",
                param.name, param.location, schema_type, required, desc, extras
            ));
        }
    }

    if let Some(body) = &endpoint.request_body {
        lines.push(format!("\n**Request Body** (`{}`):", body.content_type));
        lines.push(body.schema_summary.clone());
    }

    if !endpoint.responses.is_empty() {
        lines.push("\n**Responses:**".to_string());
        for response in &endpoint.responses {
            let schema = response
                .schema_summary
                .as_ref()
                .map(|s| format!(" - {}", s))
                .unwrap_or_default();
            lines.push(format!(
                "- `{}`: {}{}",
                response.status_code, response.description, schema
            ));
        }
    }

    lines.push(
        "\nWrite complete documentation for this endpoint including: a description of its purpose \
         and use cases, a realistic request example with domain-appropriate sample values, a \
         realistic response example, common error codes and how to handle them, and any practical \
         tips for developers."
            .to_string(),
    );

    lines.join("\n")
}

/// Builds the user message asking for the API overview section.
pub fn build_overview_prompt(spec: &Specification) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Write an overview and introduction section for the following API:\n".to_string());
    lines.push(format!("**Title:** {}", spec.title));
    lines.push(format!("**Version:** {}", spec.version));

    if let Some(description) = &spec.description {
        lines.push(format!("**Description:** {}", description));
    }
    if let Some(base_url) = &spec.base_url {
        lines.push(format!("**Base URL:** {}", base_url));
    }

    lines.push(format!("\n**Endpoints ({}):**", spec.endpoints.len()));
    for ep in &spec.endpoints {
        let summary = ep
            .summary
            .as_ref()
            .map(|s| format!(" - {}", s))
            .unwrap_or_default();
        lines.push(format!("- {} {}{}", ep.method, ep.path, summary));
    }

    lines.push(
        "\nWrite an introduction section suitable for the top of the API documentation. \
         Include: what this API does, who it is for, key concepts a developer needs to understand, \
         and a brief overview of the available endpoints."
            .to_string(),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{HttpMethod, Parameter, RequestBody, ResponseInfo};

    fn sample_endpoint() -> Endpoint {
        Endpoint {
            method: HttpMethod::Get,
            path: "/members/{id}".into(),
            operation_id: Some("getMember".into()),
            summary: Some("Fetch a member".into()),
            description: None,
            tags: vec!["members".into(), "read".into()],
            parameters: vec![Parameter {
                name: "id".into(),
                location: "path".into(),
                required: true,
                schema_type: "string".into(),
                format: Some("uuid".into()),
                enum_values: vec![],
                example: Some("3f2a".into()),
                description: Some("Member identifier".into()),
            }],
            request_body: Some(RequestBody {
                content_type: "application/json".into(),
                schema_summary: "{ points: integer }".into(),
                required: true,
            }),
            responses: vec![
                ResponseInfo {
                    status_code: "200".into(),
                    description: "OK".into(),
                    schema_summary: Some("{ id: string }".into()),
                },
                ResponseInfo {
                    status_code: "404".into(),
                    description: "Not found".into(),
                    schema_summary: None,
                },
            ],
        }
    }

    #[test]
    fn test_endpoint_prompt_contents() {
        let prompt = build_endpoint_prompt(&sample_endpoint());
        assert!(prompt.contains("**Method:** GET"));
        assert!(prompt.contains("**Path:** /members/{id}"));
        assert!(prompt.contains("**Operation ID:** getMember"));
        assert!(prompt.contains("**Tags:** members, read"));
        assert!(prompt.contains(
            "- `id` (path, string (uuid), required) - Member identifier [example: 3f2a]"
        ));
        assert!(prompt.contains("**Request Body** (`application/json`):\n{ points: integer }"));
        assert!(prompt.contains("- `200`: OK - { id: string }"));
        assert!(prompt.contains("- `404`: Not found\n"));
        assert!(!prompt.contains("**Description:**"));
    }

    #[test]
    fn test_endpoint_prompt_omits_empty_sections() {
        let mut ep = sample_endpoint();
        ep.parameters.clear();
        ep.request_body = None;
        ep.responses.clear();
        let prompt = build_endpoint_prompt(&ep);
        assert!(!prompt.contains("**Parameters:**"));
        assert!(!prompt.contains("**Request Body**"));
        assert!(!prompt.contains("**Responses:**"));
        assert!(prompt.to_lowercase().contains("example"));
    }

    #[test]
    fn test_overview_prompt() {
        let spec = Specification {
            title: "Rewards API".into(),
            version: "2.0".into(),
            description: None,
            base_url: Some("https://api.rewards.example.com".into()),
            endpoints: vec![sample_endpoint()],
        };
        let prompt = build_overview_prompt(&spec);
        assert!(prompt.contains("**Title:** Rewards API"));
        assert!(prompt.contains("**Base URL:** https://api.rewards.example.com"));
        assert!(prompt.contains("**Endpoints (1):**"));
        assert!(prompt.contains("- GET /members/{id} - Fetch a member"));
        assert!(!prompt.contains("**Description:**"));
    }
}
