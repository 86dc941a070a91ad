//! Typed WHERE clauses for discovery listings
//!
//! Values are always bound, never spliced into SQL text.

use sqlx::{QueryBuilder, Sqlite};
use tempo_core::types::{DiscoverQuery, UserId};

/// Filterable column of a collection joined with its owner (`c` and `u`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    IsPublic,
    OwnerId,
    Name,
    Description,
    OwnerName,
    OwnerUsername,
    Tags,
}

impl Field {
    fn column(self) -> &'static str {
        match self {
            Field::IsPublic => "c.is_public",
            Field::OwnerId => "c.owner_id",
            Field::Name => "c.name",
            Field::Description => "c.description",
            Field::OwnerName => "COALESCE(NULLIF(TRIM(u.name), ''), u.username)",
            Field::OwnerUsername => "u.username",
            Field::Tags => "c.tags",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    /// Case-insensitive substring match
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: Field,
    pub op: Op,
    pub value: Value,
}

impl Clause {
    pub fn new(field: Field, op: Op, value: Value) -> Self {
        Self { field, op, value }
    }

    fn contains(field: Field, needle: &str) -> Self {
        Self::new(field, Op::Contains, Value::Text(needle.to_string()))
    }

    fn push_to(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        let column = self.field.column();
        match self.op {
            Op::Eq => {
                builder.push(column).push(" = ");
            }
            Op::Ne => {
                builder.push(column).push(" <> ");
            }
            Op::Contains => {
                builder.push("instr(lower(").push(column).push("), lower(");
            }
        }

        match &self.value {
            Value::Text(text) => builder.push_bind(text.clone()),
            Value::Int(n) => builder.push_bind(*n),
            Value::Bool(b) => builder.push_bind(*b),
        };

        if self.op == Op::Contains {
            builder.push(")) > 0");
        }
    }
}

/// `all` clauses are ANDed; a non-empty `any` list adds one ORed group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub all: Vec<Clause>,
    pub any: Vec<Clause>,
}

impl Predicate {
    /// Public collections not owned by `requester`, matching the search text
    /// or any requested tag
    pub fn for_discovery(requester: UserId, query: &DiscoverQuery) -> Self {
        let all = vec![
            Clause::new(Field::IsPublic, Op::Eq, Value::Bool(true)),
            Clause::new(Field::OwnerId, Op::Ne, Value::Int(requester)),
        ];

        let mut any = Vec::new();
        if let Some(search) = query.search_text() {
            any.push(Clause::contains(Field::Name, search));
            any.push(Clause::contains(Field::Description, search));
            any.push(Clause::contains(Field::OwnerName, search));
            any.push(Clause::contains(Field::OwnerUsername, search));
        }
        for tag in &query.tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() {
                // Stored as a JSON array, so a quoted token matches whole tags only
                any.push(Clause::contains(Field::Tags, &format!("\"{tag}\"")));
            }
        }

        Self { all, any }
    }

    /// Append ` WHERE ...`; nothing when there are no clauses
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        if self.all.is_empty() && self.any.is_empty() {
            return;
        }

        builder.push(" WHERE ");
        let mut first = true;
        for clause in &self.all {
            if !first {
                builder.push(" AND ");
            }
            clause.push_to(builder);
            first = false;
        }

        if !self.any.is_empty() {
            if !first {
                builder.push(" AND ");
            }
            builder.push("(");
            for (i, clause) in self.any.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                clause.push_to(builder);
            }
            builder.push(")");
        }
    }
}
