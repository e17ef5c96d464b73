//! Static function catalog.
//!
//! Ten task descriptors (codes A1–A10), each with a JSON-Schema
//! parameter block. The catalog plays two roles: it is the set of
//! invocable functions sent to the completion endpoint, and it is the
//! validation contract the dispatcher re-checks before invoking a
//! handler — the model's output is untrusted input.
//!
//! The list is initialized once and never mutated; changing the set of
//! supported tasks means redeploying with a matching handler.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

/// One entry in the function catalog.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskDescriptor {
    /// Task code (e.g. `"A3"`), unique within the catalog.
    pub name: &'static str,
    /// Human-readable one-liner given to the model.
    pub description: &'static str,
    /// JSON Schema object describing the expected arguments.
    pub parameters: Value,
}

impl TaskDescriptor {
    /// Names listed in the schema's `required` array.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.parameters["required"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// The `{"type":"function","function":{…}}` wire form sent to the API.
    pub fn tool_def(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

static CATALOG: Lazy<Vec<TaskDescriptor>> = Lazy::new(|| {
    vec![
        TaskDescriptor {
            name: "A1",
            description: "Run a Python script from a given URL, passing an email as the argument.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "pattern": r"^[\w.+-]+@[\w.-]+\.\w+$"
                    }
                },
                "required": ["email"]
            }),
        },
        TaskDescriptor {
            name: "A2",
            description: "Format a markdown file using a specified version of Prettier.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "prettier_version": {
                        "type": "string",
                        "pattern": r"^prettier@\d+\.\d+\.\d+$"
                    },
                    "filename": {
                        "type": "string",
                        "pattern": r"\.md$"
                    }
                },
                "required": ["prettier_version", "filename"]
            }),
        },
        TaskDescriptor {
            name: "A3",
            description: "Count the number of occurrences of a specific weekday in a date file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/dates.txt"
                    },
                    "targetfile": {
                        "type": "string",
                        "pattern": r"\.txt$"
                    },
                    "weekday": {
                        "type": "string",
                        "pattern": r"(?i)^(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$"
                    }
                },
                "required": ["filename", "targetfile", "weekday"]
            }),
        },
        TaskDescriptor {
            name: "A4",
            description: "Sort a JSON contacts file and save the sorted version to a target file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "pattern": r"\.json$",
                        "default": "data/contacts.json"
                    },
                    "targetfile": {
                        "type": "string",
                        "pattern": r"\.json$",
                        "default": "data/contacts-sorted.json"
                    }
                },
                "required": ["filename", "targetfile"]
            }),
        },
        TaskDescriptor {
            name: "A5",
            description: "Retrieve the most recent log files from a directory and save their first lines to an output file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "log_dir_path": {
                        "type": "string",
                        "default": "data/logs"
                    },
                    "output_file_path": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/logs-recent.txt"
                    },
                    "num_files": {
                        "type": "integer",
                        "minimum": 1,
                        "default": 10
                    }
                },
                "required": ["log_dir_path", "output_file_path", "num_files"]
            }),
        },
        TaskDescriptor {
            name: "A6",
            description: "Generate an index of markdown documents from a directory and save it as a JSON file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "doc_dir_path": {
                        "type": "string",
                        "default": "data/docs"
                    },
                    "output_file_path": {
                        "type": "string",
                        "pattern": r"\.json$",
                        "default": "data/docs/index.json"
                    }
                },
                "required": ["doc_dir_path", "output_file_path"]
            }),
        },
        TaskDescriptor {
            name: "A7",
            description: "Extract the sender's email address from a text file and save it to an output file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/email.txt"
                    },
                    "output_file": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/email-sender.txt"
                    }
                },
                "required": ["filename", "output_file"]
            }),
        },
        TaskDescriptor {
            name: "A8",
            description: "Generate an image representation of credit card details from a text file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/credit-card.txt"
                    },
                    "image_path": {
                        "type": "string",
                        "default": "data/credit-card.svg"
                    }
                },
                "required": ["filename", "image_path"]
            }),
        },
        TaskDescriptor {
            name: "A9",
            description: "Find the most similar pair of comments in a text file and save them to an output file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/comments.txt"
                    },
                    "output_filename": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/comments-similar.txt"
                    }
                },
                "required": ["filename", "output_filename"]
            }),
        },
        TaskDescriptor {
            name: "A10",
            description: "Compute high-value (gold) ticket sales from a database and save the result to a text file.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "pattern": r"\.db$",
                        "default": "data/ticket-sales.db"
                    },
                    "output_filename": {
                        "type": "string",
                        "pattern": r"\.txt$",
                        "default": "data/ticket-sales-gold.txt"
                    },
                    "query": {
                        "type": "string",
                        "default": "SELECT SUM(units * price) FROM tickets WHERE type = 'Gold'"
                    }
                },
                "required": ["filename", "output_filename", "query"]
            }),
        },
    ]
});

/// Per-descriptor compiled parameter patterns.
///
/// Built once from the catalog; a pattern that fails to compile is a
/// catalog bug and panics at first use (covered by tests).
static PATTERNS: Lazy<HashMap<&'static str, HashMap<String, Regex>>> = Lazy::new(|| {
    catalog()
        .iter()
        .map(|d| {
            let compiled = d.parameters["properties"]
                .as_object()
                .into_iter()
                .flatten()
                .filter_map(|(param, schema)| {
                    schema.get("pattern").and_then(Value::as_str).map(|p| {
                        let re = Regex::new(p)
                            .unwrap_or_else(|e| panic!("bad pattern for {}.{param}: {e}", d.name));
                        (param.clone(), re)
                    })
                })
                .collect();
            (d.name, compiled)
        })
        .collect()
});

/// The fixed, ordered function catalog.
pub fn catalog() -> &'static [TaskDescriptor] {
    &CATALOG
}

/// Look up a descriptor by task code.
pub fn descriptor(name: &str) -> Option<&'static TaskDescriptor> {
    CATALOG.iter().find(|d| d.name == name)
}

/// Compiled pattern for a task parameter, if the schema declares one.
pub fn pattern(task: &str, param: &str) -> Option<&'static Regex> {
    PATTERNS.get(task).and_then(|m| m.get(param))
}

/// The full catalog in function-calling wire form.
pub fn tool_defs() -> Vec<Value> {
    CATALOG.iter().map(TaskDescriptor::tool_def).collect()
}
