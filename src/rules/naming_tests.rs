use super::*;
use crate::config::Config;
use crate::diagnostics::Severity;
use crate::rules::test_fixtures::{Fixture, rule_ids};

#[test]
fn lowercase_namespace_flagged() {
    let fixture = Fixture::new("namespace kodi\n{\n}\n");
    let diags = fixture.run(&NamespaceNaming::new());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, NAMESPACE_ID);
    assert!(diags[0].message.contains("kodi"));
}

#[test]
fn uppercase_namespace_passes() {
    let fixture = Fixture::new("namespace PVR\n{\nnamespace ADDON_UTILS\n{\n}\n}\n");
    assert!(fixture.run(&NamespaceNaming::new()).is_empty());
}

#[test]
fn class_without_c_prefix_flagged() {
    let fixture = Fixture::new("class logger\n{\n};\n");
    let diags = fixture.run(&ClassNaming::new());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, CLASS_ID);
}

#[test]
fn class_with_c_prefix_passes() {
    let fixture = Fixture::new("class CLogger\n{\n};\nstruct CPoint\n{\n};\n");
    assert!(fixture.run(&ClassNaming::new()).is_empty());
}

#[test]
fn interface_by_name_passes() {
    let fixture = Fixture::new("class IPlayerCallback\n{\n};\n");
    assert!(fixture.run(&ClassNaming::new()).is_empty());
}

#[test]
fn pure_virtual_body_expects_interface_name() {
    let fixture = Fixture::new(
        "class CChannelSource\n{\npublic:\n  virtual void Open() = 0;\n  virtual int Read() const = 0;\n};\n",
    );
    let diags = fixture.run(&ClassNaming::new());
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("interface"));
}

#[test]
fn mixed_body_is_a_plain_class() {
    let fixture = Fixture::new(
        "class CChannelSource\n{\npublic:\n  virtual void Open() = 0;\n  int Count();\n};\n",
    );
    assert!(fixture.run(&ClassNaming::new()).is_empty());
}

#[test]
fn enum_names_and_enumerators() {
    let fixture = Fixture::new("enum class Color\n{\n  RED,\n  DARK_BLUE\n};\n");
    assert!(fixture.run(&ClassNaming::new()).is_empty());
}

#[test]
fn enum_with_c_prefix_flagged() {
    let fixture = Fixture::new("enum class CColor\n{\n  RED\n};\n");
    let diags = fixture.run(&ClassNaming::new());
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("C prefix"));
}

#[test]
fn lowercase_enumerator_flagged() {
    let fixture = Fixture::new("enum Color\n{\n  red,\n  GREEN\n};\n");
    let diags = fixture.run(&ClassNaming::new());
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("red"));
}

#[test]
fn lowercase_method_in_class_flagged() {
    let fixture = Fixture::new("class CFoo\n{\n  void doThing()\n  {\n  }\n};\n");
    let diags = fixture.run(&MethodNaming);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, METHOD_ID);
}

#[test]
fn lowercase_out_of_class_definition_flagged() {
    let fixture = Fixture::new("void CFoo::doThing()\n{\n}\n");
    let diags = fixture.run(&MethodNaming);
    assert_eq!(diags.len(), 1);
}

#[test]
fn uppercase_methods_pass() {
    let fixture = Fixture::new("void CFoo::DoThing()\n{\n}\nnamespace UTILS\n{\nvoid Helper()\n{\n}\n}\n");
    assert!(fixture.run(&MethodNaming).is_empty());
}

#[test]
fn main_is_exempt() {
    let fixture = Fixture::new("int main()\n{\n  return 0;\n}\n");
    assert!(fixture.run(&MethodNaming).is_empty());
}

#[test]
fn member_without_prefix_flagged() {
    let fixture = Fixture::new("class CFoo\n{\n  int x;\n  int m_count;\n};\n");
    let diags = fixture.run(&MemberNaming);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, MEMBER_ID);
    assert!(diags[0].message.contains("m_"));
}

#[test]
fn method_declarations_not_members() {
    let fixture = Fixture::new("class CFoo\n{\n  void Bar();\n  int Count() const;\n};\n");
    assert!(fixture.run(&MemberNaming).is_empty());
}

#[test]
fn global_without_prefix_gets_style_and_warning() {
    let fixture = Fixture::new("int count;\n");
    let diags = fixture.run(&MemberNaming);
    assert_eq!(diags.len(), 2);
    assert_eq!(rule_ids(&diags), vec![MEMBER_ID, MEMBER_ID]);
    assert!(diags.iter().any(|d| d.severity == Severity::Warning));
    assert!(diags.iter().any(|d| d.severity == Severity::Style));
}

#[test]
fn prefixed_global_still_warned() {
    let fixture = Fixture::new("int g_count;\n");
    let diags = fixture.run(&MemberNaming);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Warning);
    assert!(diags[0].message.contains("discouraged"));
}

#[test]
fn file_scope_const_exempt_from_global_rules() {
    let fixture = Fixture::new("const int MAX_COUNT = 10;\n");
    assert!(fixture.run(&MemberNaming).is_empty());
}

#[test]
fn lowercase_file_const_flagged() {
    let fixture = Fixture::new("const int maxCount = 10;\n");
    let diags = fixture.run(&ConstNaming::new());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, CONST_ID);
}

#[test]
fn uppercase_file_const_passes() {
    let fixture = Fixture::new("const int MAX_COUNT = 10;\nconstexpr double PI_VALUE = 3.14;\n");
    assert!(fixture.run(&ConstNaming::new()).is_empty());
}

#[test]
fn non_primitive_const_not_judged() {
    let fixture = Fixture::new("const std::string g_name = \"a\";\n");
    assert!(fixture.run(&ConstNaming::new()).is_empty());
}

#[test]
fn allow_list_exempts_file() {
    let config = Config::parse("naming.allow-files = legacy/**\n").unwrap();
    let fixture = Fixture::with_config("legacy/old.cpp", "class logger\n{\n};\n", config);
    assert!(fixture.run(&ClassNaming::new()).is_empty());
    assert!(fixture.run(&MemberNaming).is_empty());
}
