//! List parameters for the generic `/collections/<name>` endpoints.
//!
//! Every set field becomes one flat query pair. Relations are comma-joined, filters are keyed as
//! `<field>_<op>`, and anything left unset is omitted.

use crate::social_client::api;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Name of a field, sort key or relation as the backend spells it in a query string.
pub trait QueryName: Copy + Debug {
    fn query_name(&self) -> &'static str;
}

pub trait Collection {
    /// Path segment under `/api/collections/`.
    const PATH: &'static str;
    type Item: DeserializeOwned;
    type SortField: QueryName;
    type Field: QueryName;
    type Relation: QueryName;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Like,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    pub fn suffix(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Like => "like",
            FilterOp::In => "in",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<F> {
    pub field: F,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ListParams<C: Collection> {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub order_by: Option<C::SortField>,
    pub order: Option<Order>,
    pub relations: Vec<C::Relation>,
    pub filters: Vec<Filter<C::Field>>,
}

impl<C: Collection> Default for ListParams<C> {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
            order_by: None,
            order: None,
            relations: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl<C: Collection> ListParams<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn order_by(mut self, field: C::SortField, order: Order) -> Self {
        self.order_by = Some(field);
        self.order = Some(order);
        self
    }

    pub fn relations(mut self, relations: &[C::Relation]) -> Self {
        self.relations = relations.to_vec();
        self
    }

    /// Adds `relation` in front of the current list unless already present.
    pub fn with_relation(mut self, relation: C::Relation) -> Self {
        let name = relation.query_name();
        if !self.relations.iter().any(|r| r.query_name() == name) {
            self.relations.insert(0, relation);
        }
        self
    }

    /// NB: a second filter on the same field and operator replaces the first, the way a map of
    /// query params would.
    pub fn filter(mut self, field: C::Field, op: FilterOp, value: impl Into<String>) -> Self {
        self.filters
            .retain(|f| !(f.field.query_name() == field.query_name() && f.op == op));
        self.filters.push(Filter {
            field,
            op,
            value: value.into(),
        });
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("perPage".to_string(), per_page.to_string()));
        }
        if let Some(order_by) = self.order_by {
            pairs.push(("orderBy".to_string(), order_by.query_name().to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.as_str().to_string()));
        }
        pairs.extend(relations_pair(&self.relations));

        for Filter { field, op, value } in &self.filters {
            pairs.push((
                format!("{}_{}", field.query_name(), op.suffix()),
                value.clone(),
            ));
        }

        pairs
    }
}

/// `relations=a,b` for single-resource fetches; nothing for an empty list.
pub fn relations_pair<R: QueryName>(relations: &[R]) -> Option<(String, String)> {
    if relations.is_empty() {
        return None;
    }
    let joined = relations.iter().map(|r| r.query_name()).join(",");
    Some(("relations".to_string(), joined))
}

macro_rules! query_names {
    ($name:ident { $($variant:ident => $query:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl QueryName for $name {
            fn query_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $query),+
                }
            }
        }
    };
}

query_names!(TweetSort { Content => "content", CreatedAt => "createdAt" });
query_names!(TweetField { Content => "content", CreatedAt => "createdAt", AuthorId => "author.id" });
query_names!(TweetRelation { Author => "author", Comments => "comments" });

query_names!(CommentSort { Content => "content", CreatedAt => "createdAt" });
query_names!(CommentField {
    Content => "content",
    CreatedAt => "createdAt",
    TweetId => "tweet.id",
    AuthorId => "author.id",
});
query_names!(CommentRelation { Author => "author", Tweet => "tweet" });

query_names!(UserSort { Username => "username" });
query_names!(UserField { Username => "username" });
query_names!(UserRelation { Tweets => "tweets", Comments => "comments" });

#[derive(Debug, Clone, Copy)]
pub struct Tweets;

impl Collection for Tweets {
    const PATH: &'static str = "tweets";
    type Item = api::Tweet;
    type SortField = TweetSort;
    type Field = TweetField;
    type Relation = TweetRelation;
}

#[derive(Debug, Clone, Copy)]
pub struct Comments;

impl Collection for Comments {
    const PATH: &'static str = "comments";
    type Item = api::Comment;
    type SortField = CommentSort;
    type Field = CommentField;
    type Relation = CommentRelation;
}

#[derive(Debug, Clone, Copy)]
pub struct Users;

impl Collection for Users {
    const PATH: &'static str = "users";
    type Item = api::User;
    type SortField = UserSort;
    type Field = UserField;
    type Relation = UserRelation;
}

pub type TweetListParams = ListParams<Tweets>;
pub type CommentListParams = ListParams<Comments>;
pub type UserListParams = ListParams<Users>;

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_relations_and_page() {
        let params = TweetListParams::new()
            .relations(&[TweetRelation::Author, TweetRelation::Comments])
            .page(2);
        let pairs = params.to_query_pairs();

        assert!(pairs.contains(&pair("relations", "author,comments")));
        assert!(pairs.contains(&pair("page", "2")));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_empty_params() {
        assert!(UserListParams::new().to_query_pairs().is_empty());
        assert!(UserListParams::new().relations(&[]).to_query_pairs().is_empty());
    }

    #[test]
    fn test_sort_and_filters() {
        let params = CommentListParams::new()
            .per_page(20)
            .order_by(CommentSort::CreatedAt, Order::Desc)
            .filter(CommentField::TweetId, FilterOp::Eq, "t1")
            .filter(CommentField::CreatedAt, FilterOp::Gte, "2024-01-01");

        assert_eq!(
            params.to_query_pairs(),
            vec![
                pair("perPage", "20"),
                pair("orderBy", "createdAt"),
                pair("order", "DESC"),
                pair("tweet.id_eq", "t1"),
                pair("createdAt_gte", "2024-01-01"),
            ]
        );
    }

    #[test]
    fn test_filter_replaces_same_key() {
        let params = UserListParams::new()
            .filter(UserField::Username, FilterOp::Like, "%al%")
            .filter(UserField::Username, FilterOp::Like, "%bo%")
            .filter(UserField::Username, FilterOp::Neq, "root");

        assert_eq!(
            params.to_query_pairs(),
            vec![pair("username_like", "%bo%"), pair("username_neq", "root")]
        );
    }

    #[test]
    fn test_with_relation_is_idempotent() {
        let params = CommentListParams::new()
            .relations(&[CommentRelation::Tweet])
            .with_relation(CommentRelation::Author)
            .with_relation(CommentRelation::Author);

        assert_eq!(
            relations_pair(&params.relations),
            Some(pair("relations", "author,tweet"))
        );
    }

    #[test]
    fn test_all_operator_suffixes() {
        let ops = [
            FilterOp::Eq,
            FilterOp::Neq,
            FilterOp::Like,
            FilterOp::In,
            FilterOp::Gt,
            FilterOp::Gte,
            FilterOp::Lt,
            FilterOp::Lte,
        ];
        let suffixes: Vec<&str> = ops.iter().map(|op| op.suffix()).collect();
        assert_eq!(
            suffixes,
            vec!["eq", "neq", "like", "in", "gt", "gte", "lt", "lte"]
        );
    }
}
