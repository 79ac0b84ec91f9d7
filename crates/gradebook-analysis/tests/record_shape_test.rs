//! Record-shape rule over real files on disk.

use std::path::PathBuf;

use gradebook_analysis::parsers::parse_source;
use gradebook_analysis::rules::record_shape::{find_shape_violations, SignatureSlot};
use gradebook_analysis::rules::{check_methods_use_records, RuleSettings};
use gradebook_core::config::RulesConfig;
use tempfile::TempDir;

fn write_candidate(src: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service.py");
    std::fs::write(&path, src).unwrap();
    (dir, path)
}

fn grade(src: &str) -> bool {
    let (_dir, path) = write_candidate(src);
    check_methods_use_records(&path, &RuleSettings::default())
}

#[test]
fn record_params_and_returns_pass() {
    assert!(grade(
        r#"
from dataclasses import dataclass

@dataclass
class UserRequest:
    name: str

@dataclass
class UserResponse:
    id: int

class UserService:
    def create_user(self, request: UserRequest) -> UserResponse:
        return UserResponse(id=1)

    def get_user(self, user_id: int) -> UserResponse | None:
        return None
"#
    ));
}

#[test]
fn bare_dict_param_fails() {
    assert!(!grade(
        r#"
class UserService:
    def create_user(self, data: dict) -> str:
        return "ok"
"#
    ));
}

#[test]
fn parameterized_dict_param_passes() {
    assert!(grade(
        r#"
from typing import Any

class UserService:
    def create_user(self, data: dict[str, Any]) -> str:
        return "ok"
"#
    ));
}

#[test]
fn parameterized_dict_return_fails() {
    assert!(!grade(
        r#"
from typing import Any

class UserService:
    def get_user(self, user_id: int) -> dict[str, Any]:
        return {}
"#
    ));
}

#[test]
fn bare_dict_return_fails() {
    assert!(!grade(
        r#"
class UserService:
    def get_user(self, user_id: int) -> dict:
        return {}
"#
    ));
}

#[test]
fn primitive_types_pass() {
    assert!(grade(
        r#"
class Calculator:
    def add(self, a: int, b: int) -> int:
        return a + b

    def concat(self, a: str, b: str) -> str:
        return a + b

    def is_valid(self, value: float) -> bool:
        return value > 0
"#
    ));
}

#[test]
fn private_methods_are_checked() {
    assert!(!grade(
        r#"
from dataclasses import dataclass

@dataclass
class UserResponse:
    id: int

class UserService:
    def get_user(self, user_id: int) -> UserResponse:
        data = self._fetch_data(user_id)
        return UserResponse(id=int(data["id"]))

    def _fetch_data(self, user_id: int) -> dict[str, str]:
        return {"id": str(user_id)}
"#
    ));
}

#[test]
fn typing_dict_return_fails() {
    assert!(!grade(
        r#"
from typing import Dict

class UserService:
    def get_user(self, user_id: int) -> Dict[str, str]:
        return {}
"#
    ));
}

#[test]
fn union_with_dict_return_fails() {
    assert!(!grade(
        r#"
from dataclasses import dataclass

@dataclass
class UserResponse:
    id: int

class UserService:
    def get_user(self, user_id: int) -> UserResponse | dict[str, str]:
        return {}
"#
    ));
}

#[test]
fn unannotated_methods_pass() {
    assert!(grade(
        r#"
class UserService:
    def create_user(self, name, age):
        return name

    def get_user(self, user_id):
        return user_id
"#
    ));
}

#[test]
fn list_and_tuple_types_pass() {
    assert!(grade(
        r#"
from dataclasses import dataclass

@dataclass
class User:
    id: int

class UserService:
    def get_all_users(self) -> list[User]:
        return []

    def get_user_tuple(self, user_id: int) -> tuple[int, str]:
        return (user_id, "x")
"#
    ));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!check_methods_use_records(
        &dir.path().join("nope.py"),
        &RuleSettings::default()
    ));
}

#[test]
fn syntax_error_fails() {
    assert!(!grade("def foo(x: dict[str, Any]\n    pass\n"));
}

#[test]
fn empty_file_passes() {
    assert!(grade(""));
}

#[test]
fn standalone_functions_are_checked() {
    assert!(!grade(
        r#"
def get_config() -> dict[str, str]:
    return {}

def process_data(data: dict) -> str:
    return ""
"#
    ));
}

#[test]
fn async_methods_with_records_pass() {
    assert!(grade(
        r#"
from dataclasses import dataclass

@dataclass
class AsyncRequest:
    url: str

@dataclass
class AsyncResponse:
    body: str

class Client:
    async def fetch(self, request: AsyncRequest) -> AsyncResponse:
        return AsyncResponse(body="")
"#
    ));
}

#[test]
fn async_method_returning_dict_fails() {
    assert!(!grade(
        r#"
class Client:
    async def fetch(self, url: str) -> dict[str, str]:
        return {}
"#
    ));
}

#[test]
fn record_methods_may_return_dicts() {
    assert!(grade(
        r#"
from dataclasses import dataclass

@dataclass
class User:
    name: str
    age: int

    def to_dict(self) -> dict[str, str | int]:
        return {"name": self.name, "age": self.age}

    def get_metadata(self) -> dict[str, str]:
        return {}
"#
    ));
}

#[test]
fn qualified_record_decorator_is_recognized() {
    assert!(grade(
        r#"
import dataclasses

@dataclasses.dataclass
class User:
    name: str

    def to_dict(self) -> dict[str, str]:
        return {"name": self.name}
"#
    ));
}

#[test]
fn called_record_decorator_is_recognized() {
    assert!(grade(
        r#"
from dataclasses import dataclass

@dataclass(frozen=True)
class User:
    name: str

    def to_dict(self) -> dict[str, str]:
        return {"name": self.name}
"#
    ));
}

#[test]
fn plain_class_cannot_return_dict() {
    assert!(!grade(
        r#"
class UserService:
    def get_user_data(self, user_id: int) -> dict[str, str]:
        return {}
"#
    ));
}

#[test]
fn record_scope_does_not_leak_to_siblings_or_nested_classes() {
    let src = r#"
from dataclasses import dataclass

@dataclass
class Outer:
    name: str

    def to_dict(self) -> dict[str, str]:
        return {}

    class Inner:
        def dump(self) -> dict[str, str]:
            return {}

class Service:
    def load(self) -> dict:
        return {}
"#;
    let tree = parse_source(src.as_bytes()).unwrap();
    let violations = find_shape_violations(&tree, &RuleSettings::default());
    let functions: Vec<_> = violations.iter().map(|v| v.function.as_str()).collect();
    assert_eq!(functions, ["dump", "load"]);
    assert!(violations.iter().all(|v| v.slot == SignatureSlot::Return));
}

#[test]
fn violations_name_the_parameter() {
    let tree = parse_source(b"def handle(payload: dict, *rest: dict) -> str:\n    return ''\n").unwrap();
    let violations = find_shape_violations(&tree, &RuleSettings::default());
    let slots: Vec<_> = violations.iter().map(|v| v.slot.clone()).collect();
    assert_eq!(
        slots,
        [
            SignatureSlot::Parameter("payload".to_string()),
            SignatureSlot::Parameter("rest".to_string()),
        ]
    );
    assert_eq!(violations[0].line, 1);
}

#[test]
fn configured_names_replace_defaults() {
    let settings = RuleSettings::from_config(&RulesConfig {
        record_decorators: vec!["attrs".to_string()],
        map_types: vec!["Mapping".to_string()],
        ..RulesConfig::default()
    });
    let src = r#"
@attrs
class Point:
    def as_map(self) -> Mapping[str, int]:
        return {}

class Service:
    def raw(self) -> dict:
        return {}
"#;
    let tree = parse_source(src.as_bytes()).unwrap();
    assert!(find_shape_violations(&tree, &settings).is_empty());
}
