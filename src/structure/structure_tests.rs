use std::path::PathBuf;

use super::*;
use crate::lexer::lex;
use crate::source::SourceFile;

fn build(source: &str) -> (Vec<crate::lexer::Token>, Structure) {
    let file = SourceFile::from_bytes(PathBuf::from("t.cpp"), source.as_bytes().to_vec()).unwrap();
    let tokens = lex(&file).unwrap();
    let structure = Structure::build(&tokens);
    (tokens, structure)
}

fn frame_kinds(structure: &Structure) -> Vec<FrameKind> {
    structure.frames.iter().map(|f| f.kind).collect()
}

fn find_frame<'a>(structure: &'a Structure, kind: FrameKind) -> &'a Frame {
    structure
        .frames
        .iter()
        .find(|f| f.kind == kind)
        .expect("frame of requested kind")
}

#[test]
fn file_frame_is_root() {
    let (_, structure) = build("int x;\n");
    assert_eq!(structure.frames[0].kind, FrameKind::File);
    assert!(structure.frames[0].parent.is_none());
}

#[test]
fn function_definition() {
    let (tokens, structure) = build("void Foo()\n{\n  return;\n}\n");
    let frame = find_frame(&structure, FrameKind::Function);
    assert_eq!(frame.name.as_deref(), Some("Foo"));
    assert!(tokens[frame.open].is_punct("{"));
    assert!(tokens[frame.close].is_punct("}"));

    let ret = tokens.iter().position(|t| t.text == "return").unwrap();
    let frame_id = structure.frame_of_token(ret);
    assert_eq!(structure.frames[frame_id].kind, FrameKind::Function);
    assert_eq!(structure.indent_level(frame_id), 1);
}

#[test]
fn named_and_anonymous_namespaces() {
    let (_, structure) = build("namespace PVR\n{\n}\nnamespace\n{\n}\n");
    let named: Vec<_> = structure
        .frames
        .iter()
        .filter(|f| f.kind == FrameKind::Namespace)
        .collect();
    assert_eq!(named.len(), 2);
    assert_eq!(named[0].name.as_deref(), Some("PVR"));
    assert_eq!(named[1].name, None);
}

#[test]
fn namespace_does_not_add_indent() {
    let (_, structure) = build("namespace PVR\n{\nclass CFoo\n{\n};\n}\n");
    let class_frame = find_frame(&structure, FrameKind::Class);
    assert_eq!(class_frame.name.as_deref(), Some("CFoo"));

    let class_id = structure
        .frames
        .iter()
        .position(|f| f.kind == FrameKind::Class)
        .unwrap();
    assert_eq!(structure.indent_level(class_id), 1);
    assert_eq!(structure.namespace_depth(class_id), 1);
}

#[test]
fn class_with_base_clause() {
    let (_, structure) = build("class CDerived : public CBase, public IThing\n{\n};\n");
    let frame = find_frame(&structure, FrameKind::Class);
    assert_eq!(frame.name.as_deref(), Some("CDerived"));
}

#[test]
fn struct_is_a_class_frame() {
    let (_, structure) = build("struct SPoint\n{\n};\n");
    assert_eq!(find_frame(&structure, FrameKind::Class).name.as_deref(), Some("SPoint"));
}

#[test]
fn enum_and_enum_class() {
    let (_, structure) = build("enum Color\n{\n};\nenum class Mode\n{\n};\n");
    let enums: Vec<_> = structure
        .frames
        .iter()
        .filter(|f| f.kind == FrameKind::Enum)
        .collect();
    assert_eq!(enums.len(), 2);
    assert_eq!(enums[0].name.as_deref(), Some("Color"));
    assert_eq!(enums[1].name.as_deref(), Some("Mode"));
}

#[test]
fn control_headers_record_keyword() {
    let source = "void F()\n{\n  if (x)\n  {\n  }\n  else\n  {\n  }\n  do\n  {\n  } while (x);\n}\n";
    let (_, structure) = build(source);
    let names: Vec<_> = structure
        .frames
        .iter()
        .filter(|f| f.kind == FrameKind::ControlHeader)
        .map(|f| f.name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["if", "else", "do"]);
}

#[test]
fn switch_and_case_frames() {
    let source =
        "void F()\n{\n  switch (x)\n  {\n    case 1:\n      break;\n    default:\n      break;\n  }\n}\n";
    let (tokens, structure) = build(source);
    assert!(frame_kinds(&structure).contains(&FrameKind::Switch));

    let cases: Vec<_> = structure
        .frames
        .iter()
        .filter(|f| f.kind == FrameKind::SwitchCase)
        .collect();
    assert_eq!(cases.len(), 2);
    assert_eq!(tokens[cases[0].open].text, "case");
    assert_eq!(tokens[cases[1].open].text, "default");

    // Label tokens stay with the switch; case bodies go one deeper.
    let case_idx = tokens.iter().position(|t| t.text == "case").unwrap();
    let label_frame = structure.frame_of_token(case_idx);
    assert_eq!(structure.frames[label_frame].kind, FrameKind::Switch);
    assert_eq!(structure.indent_level(label_frame), 2);

    let break_idx = tokens.iter().position(|t| t.text == "break").unwrap();
    let body_frame = structure.frame_of_token(break_idx);
    assert_eq!(structure.frames[body_frame].kind, FrameKind::SwitchCase);
    assert_eq!(structure.indent_level(body_frame), 3);
}

#[test]
fn initializer_brace_is_a_plain_block() {
    let (_, structure) = build("int a[] = {1, 2};\n");
    assert!(frame_kinds(&structure).contains(&FrameKind::Block));
    assert!(!frame_kinds(&structure).contains(&FrameKind::Class));
}

#[test]
fn constructor_with_initializer_list() {
    let (_, structure) = build("CFoo::CFoo() : m_x(0), m_y(1)\n{\n}\n");
    let frame = find_frame(&structure, FrameKind::Function);
    assert_eq!(frame.name.as_deref(), Some("CFoo"));
}

#[test]
fn method_with_cv_qualifiers() {
    let (_, structure) = build("int CFoo::Count() const noexcept\n{\n}\n");
    assert_eq!(find_frame(&structure, FrameKind::Function).name.as_deref(), Some("Count"));
}

#[test]
fn lambda_body_is_not_a_function_frame() {
    let (_, structure) = build("void F()\n{\n  auto fn = [](int a) { return a; };\n}\n");
    let functions: Vec<_> = structure
        .frames
        .iter()
        .filter(|f| f.kind == FrameKind::Function)
        .collect();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name.as_deref(), Some("F"));
}

#[test]
fn frame_closed_by_finds_braced_frame() {
    let (tokens, structure) = build("void F()\n{\n}\n");
    let close = tokens.iter().position(|t| t.is_punct("}")).unwrap();
    let id = structure.frame_closed_by(close).unwrap();
    assert_eq!(structure.frames[id].kind, FrameKind::Function);
}

#[test]
fn unbalanced_close_does_not_panic() {
    let (tokens, structure) = build("}\n");
    assert_eq!(structure.frame_of_token(0), 0);
    assert_eq!(tokens[0].text, "}");
}
