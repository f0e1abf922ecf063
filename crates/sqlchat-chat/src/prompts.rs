//! Prompt templates for the two model calls.
//!
//! The business rules the model is asked to follow (column mappings, row
//! limiting, answer formatting) live here as template text, not as code.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use tracing::debug;

use sqlchat_core::config::SqlDialect;

use crate::error::ChatError;

const SQL_QUERY_TEMPLATE_NAME: &str = "sql_query";
const RESPONSE_TEMPLATE_NAME: &str = "response";

const SQL_QUERY_TEMPLATE: &str = r#"You are a data analyst at a company. You are interacting with a user who is asking you questions about the company's database.
Based on the table schema below, write a SQL query that would answer the user's question. Take the conversation history into account.

<SCHEMA>{{ schema }}</SCHEMA>

Conversation History:
{{ history }}

Write only the SQL query and nothing else. Do not wrap the SQL query in any other text, not even backticks.
Always give each table an alias and qualify every column with that alias so no column reference is ambiguous.
{%- if dialect == "tsql" %}
Use TOP instead of LIMIT. Put TOP n at the start of the SELECT list, and only when the question asks for a bounded number of rows.
If the question contains the word "List" or "How", use DISTINCT; when both are needed, DISTINCT goes before TOP.
{%- else %}
Use a trailing LIMIT n clause to restrict the number of rows, and only when the question asks for a bounded number of rows.
If the question contains the word "List" or "How", use SELECT DISTINCT.
{%- endif %}
For anything about when a task was created, use the TaskStartedAt column, not CreatedDate.
For total allotted time use the OriginalEstimate column.
For time spent use the CompletedWork column.
For remaining time use the RemainingWork column.

For example:
Question: List any 10 projects.
{%- if dialect == "tsql" %}
SQL Query: SELECT DISTINCT TOP 10 w.project_name FROM AllWorkItems w;
{%- else %}
SQL Query: SELECT DISTINCT w.project_name FROM AllWorkItems w LIMIT 10;
{%- endif %}
Question: List any 10 users.
{%- if dialect == "tsql" %}
SQL Query: SELECT DISTINCT TOP 10 w.users FROM AllWorkItems w;
{%- else %}
SQL Query: SELECT DISTINCT w.users FROM AllWorkItems w LIMIT 10;
{%- endif %}

Your turn:

Question: {{ question }}
SQL Query:"#;

const RESPONSE_TEMPLATE: &str = r#"You are a data analyst at a company. You are interacting with a user who is asking you questions about the company's database.
Based on the table schema below, the question, the SQL query and the SQL response, write a natural language response starting with "Bot:".
Convert the SQL response into natural language. Do not print the SQL response itself.
If the SQL response contains both a count and a list (for example TaskCount and TaskList, or ProjectCount and ProjectList), include both in the answer.
If the SQL response is empty, answer exactly "{{ data_not_found }}".
Present the answer as a list, not as a paragraph.
Give all the responses complete as per the SQL response.
Do not print extra information; only give the required information to the user.
Strictly do not print the conversation history, the SQL query, or the SQL response in the Bot response.

<SCHEMA>{{ schema }}</SCHEMA>

Conversation History:
{{ history }}

SQL Query: <SQL>{{ query }}</SQL>
SQL Response: {{ response }}
User question: {{ question }}"#;

#[derive(Debug, Serialize)]
struct SqlQueryContext<'a> {
    schema: &'a str,
    history: &'a str,
    question: &'a str,
    dialect: &'static str,
}

#[derive(Debug, Serialize)]
struct ResponseContext<'a> {
    schema: &'a str,
    history: &'a str,
    query: &'a str,
    response: &'a str,
    question: &'a str,
    data_not_found: &'a str,
}

fn dialect_key(dialect: SqlDialect) -> &'static str {
    match dialect {
        SqlDialect::TransactSql => "tsql",
        SqlDialect::Sqlite => "sqlite",
    }
}

/// Compiled prompt templates, built once and shared by generator and composer.
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, ChatError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(SQL_QUERY_TEMPLATE_NAME, SQL_QUERY_TEMPLATE)?;
        env.add_template(RESPONSE_TEMPLATE_NAME, RESPONSE_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the SQL generation prompt.
    pub fn render_sql_query(
        &self,
        schema: &str,
        history: &str,
        question: &str,
        dialect: SqlDialect,
    ) -> Result<String, ChatError> {
        let tmpl = self.env.get_template(SQL_QUERY_TEMPLATE_NAME)?;
        let prompt = tmpl.render(SqlQueryContext {
            schema,
            history,
            question,
            dialect: dialect_key(dialect),
        })?;
        debug!(chars = prompt.len(), "Rendered SQL prompt");
        Ok(prompt)
    }

    /// Render the answer composition prompt.
    pub fn render_response(
        &self,
        schema: &str,
        history: &str,
        query: &str,
        response: &str,
        question: &str,
        data_not_found: &str,
    ) -> Result<String, ChatError> {
        let tmpl = self.env.get_template(RESPONSE_TEMPLATE_NAME)?;
        let prompt = tmpl.render(ResponseContext {
            schema,
            history,
            query,
            response,
            question,
            data_not_found,
        })?;
        debug!(chars = prompt.len(), "Rendered response prompt");
        Ok(prompt)
    }
}

impl std::fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLibrary").finish_non_exhaustive()
    }
}
