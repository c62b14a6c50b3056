//! Data case loader - built-in parameter tuples keyed by case set name
//!
//! Tuples replay in declaration order. An unknown set name yields no
//! tuples. Arity is not checked here: typed accessors on [`CaseTuple`]
//! report a mismatch when a case reads a parameter.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use checkrun_common::{Error, Result};

pub const GET_POST: &str = "GetPostTestCases";
pub const CREATE_POST: &str = "CreatePostTestCases";
pub const UPDATE_POST: &str = "UpdatePostTestCases";
pub const DELETE_POST: &str = "DeletePostTestCases";
pub const ADD_COMMENT: &str = "AddCommentTestCases";
pub const GET_COMMENTS_FOR_POST: &str = "GetCommentsForPostTestCases";

/// One typed case parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseValue {
    Int(i64),
    Text(String),
    Null,
}

impl std::fmt::Display for CaseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseValue::Int(v) => write!(f, "{}", v),
            CaseValue::Text(v) => write!(f, "\"{}\"", v),
            CaseValue::Null => write!(f, "null"),
        }
    }
}

pub fn int(v: i64) -> CaseValue {
    CaseValue::Int(v)
}

pub fn text(v: &str) -> CaseValue {
    CaseValue::Text(v.to_string())
}

pub const NULL: CaseValue = CaseValue::Null;

/// Ordered, fixed-arity parameters for one case invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTuple(Vec<CaseValue>);

impl CaseTuple {
    pub fn new(values: Vec<CaseValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[CaseValue] {
        &self.0
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        match self.0.get(index) {
            Some(CaseValue::Int(v)) => Ok(*v),
            _ => Err(Error::CaseArity {
                index,
                expected: "integer",
            }),
        }
    }

    /// Expected HTTP status stored as an integer parameter
    pub fn status(&self, index: usize) -> Result<u16> {
        let value = self.int(index)?;
        u16::try_from(value).map_err(|_| Error::CaseArity {
            index,
            expected: "status code",
        })
    }

    pub fn text(&self, index: usize) -> Result<&str> {
        match self.0.get(index) {
            Some(CaseValue::Text(v)) => Ok(v),
            _ => Err(Error::CaseArity {
                index,
                expected: "string",
            }),
        }
    }

    /// String parameter that may be null
    pub fn opt_text(&self, index: usize) -> Result<Option<&str>> {
        match self.0.get(index) {
            Some(CaseValue::Text(v)) => Ok(Some(v)),
            Some(CaseValue::Null) => Ok(None),
            _ => Err(Error::CaseArity {
                index,
                expected: "string or null",
            }),
        }
    }

    /// `Test_CreatePost(1,"New Test Post","This is a test post body",201)`
    pub fn label(&self, test_name: &str) -> String {
        let args: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        format!("{}({})", test_name, args.join(","))
    }
}

/// Case sets keyed by logical test name
#[derive(Debug, Clone, Default)]
pub struct CaseLoader {
    sets: BTreeMap<String, Vec<CaseTuple>>,
}

static BUILTIN: Lazy<CaseLoader> = Lazy::new(CaseLoader::with_builtin_sets);

impl CaseLoader {
    /// Loader over the fixture table shipped with the API suite
    pub fn builtin() -> &'static CaseLoader {
        &BUILTIN
    }

    pub fn from_sets<I, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<CaseTuple>)>,
        S: Into<String>,
    {
        Self {
            sets: sets.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Tuples for `name` in declaration order; empty for an unknown name
    pub fn load(&self, name: &str) -> Vec<CaseTuple> {
        self.sets.get(name).cloned().unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sets.keys().map(String::as_str).collect()
    }

    fn with_builtin_sets() -> Self {
        let row = CaseTuple::new;
        Self::from_sets([
            (
                GET_POST,
                vec![
                    // existing post and its title
                    row(vec![
                        int(1),
                        text("sunt aut facere repellat provident occaecati excepturi optio reprehenderit"),
                    ]),
                    // non-existent post
                    row(vec![int(7777), NULL]),
                    row(vec![int(0), NULL]),
                ],
            ),
            (
                CREATE_POST,
                vec![
                    row(vec![int(1), text("New Test Post"), text("This is a test post body"), int(201)]),
                    // empty title and body are accepted
                    row(vec![int(1), text(""), text(""), int(201)]),
                ],
            ),
            (
                UPDATE_POST,
                vec![
                    row(vec![int(1), text("Updated title"), text("Updated body"), int(200)]),
                    row(vec![int(7777), text("Non-existent Post"), text("This should fail"), int(500)]),
                    row(vec![int(1), text("Post title updated"), text(""), int(200)]),
                ],
            ),
            (DELETE_POST, vec![row(vec![int(1), int(200)])]),
            (
                ADD_COMMENT,
                vec![
                    row(vec![
                        int(1),
                        text("Test Comment"),
                        text("abc@xyz.com"),
                        text("This is a comment body."),
                        int(201),
                    ]),
                    // empty name and an invalid email keep the literal 201
                    row(vec![int(1), text(""), text("invalid@xyz.com"), text(""), int(201)]),
                    row(vec![int(1), text("Comment"), text("invalid-email"), text("Comment body"), int(201)]),
                ],
            ),
            (
                GET_COMMENTS_FOR_POST,
                vec![
                    row(vec![int(1), int(5)]),
                    row(vec![int(7777), int(0)]),
                    row(vec![int(0), int(0)]),
                ],
            ),
        ])
    }
}

/// Load a built-in case set
pub fn load(name: &str) -> Vec<CaseTuple> {
    CaseLoader::builtin().load(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_is_empty() {
        assert!(load("NoSuchTestCases").is_empty());
        assert!(load("").is_empty());
    }

    #[test]
    fn test_declaration_order() {
        let tuples = load(GET_POST);
        let ids: Vec<i64> = tuples.iter().map(|t| t.int(0).unwrap()).collect();
        assert_eq!(ids, vec![1, 7777, 0]);
    }

    #[test]
    fn test_all_builtin_sets_present() {
        let names = CaseLoader::builtin().names();
        for name in [GET_POST, CREATE_POST, UPDATE_POST, DELETE_POST, ADD_COMMENT, GET_COMMENTS_FOR_POST] {
            assert!(names.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn test_typed_accessors() {
        let tuple = CaseTuple::new(vec![int(7777), NULL, text("x"), int(201)]);
        assert_eq!(tuple.int(0).unwrap(), 7777);
        assert_eq!(tuple.opt_text(1).unwrap(), None);
        assert_eq!(tuple.text(2).unwrap(), "x");
        assert_eq!(tuple.status(3).unwrap(), 201);
        assert!(matches!(tuple.text(1), Err(Error::CaseArity { index: 1, .. })));
        assert!(matches!(tuple.int(9), Err(Error::CaseArity { index: 9, .. })));
    }

    #[test]
    fn test_negative_status_rejected() {
        let tuple = CaseTuple::new(vec![int(-1)]);
        assert!(tuple.status(0).is_err());
    }

    #[test]
    fn test_label_matches_parameterized_name() {
        let tuple = CaseTuple::new(vec![int(7777), NULL]);
        assert_eq!(
            tuple.label("Test_GetPostById_Should_ReturnSuccess"),
            "Test_GetPostById_Should_ReturnSuccess(7777,null)"
        );
        let tuple = CaseTuple::new(vec![int(1), text("New Test Post")]);
        assert_eq!(tuple.label("Test_CreatePost"), "Test_CreatePost(1,\"New Test Post\")");
    }

    #[test]
    fn test_custom_loader_with_empty_set() {
        let loader = CaseLoader::from_sets([("EmptyTestCases", Vec::new())]);
        assert!(loader.load("EmptyTestCases").is_empty());
        assert_eq!(loader.names(), vec!["EmptyTestCases"]);
    }
}
