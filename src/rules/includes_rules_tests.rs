use super::*;
use crate::checker::fixer::apply_edits;
use crate::rules::test_fixtures::Fixture;

#[test]
fn own_header_moves_first_and_rest_sorts() {
    let source = "#include \"Application.h\"\n\
                  #include \"PVRManager.h\"\n\
                  #include \"ServiceBroker.h\"\n";
    let fixture = Fixture::with_path("PVRManager.cpp", source);
    let diags = fixture.run(&IncludeOrder);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, INCLUDE_ORDER_ID);

    let fix = diags[0].fix.clone().unwrap();
    let fixed = apply_edits(fixture.file.text(), &[fix]);
    assert_eq!(
        fixed,
        "#include \"PVRManager.h\"\n\
         #include \"Application.h\"\n\
         #include \"ServiceBroker.h\"\n"
    );
}

#[test]
fn sorted_block_passes() {
    let source = "#include \"PVRManager.h\"\n\
                  \n\
                  #include \"Application.h\"\n\
                  #include \"ServiceBroker.h\"\n";
    let fixture = Fixture::with_path("PVRManager.cpp", source);
    assert!(fixture.run(&IncludeOrder).is_empty());
}

#[test]
fn directories_sort_before_files() {
    let source = "#include \"Bar.h\"\n#include \"utils/Foo.h\"\n";
    let fixture = Fixture::with_path("x.cpp", source);
    let diags = fixture.run(&IncludeOrder);
    assert_eq!(diags.len(), 1);

    let fix = diags[0].fix.clone().unwrap();
    let fixed = apply_edits(fixture.file.text(), &[fix]);
    assert_eq!(fixed, "#include \"utils/Foo.h\"\n#include \"Bar.h\"\n");
}

#[test]
fn case_sensitive_lexicographic_order() {
    let source = "#include \"alpha.h\"\n#include \"Beta.h\"\n";
    let fixture = Fixture::with_path("x.cpp", source);
    // `B` < `a` in byte order, so Beta.h must come first.
    let diags = fixture.run(&IncludeOrder);
    assert_eq!(diags.len(), 1);
}

#[test]
fn groups_are_sorted_independently() {
    let source = "#include \"a.h\"\n\
                  #include \"b.h\"\n\
                  \n\
                  #include <map>\n\
                  #include <vector>\n";
    let fixture = Fixture::with_path("x.cpp", source);
    assert!(fixture.run(&IncludeOrder).is_empty());
}

#[test]
fn single_include_block_passes() {
    let fixture = Fixture::with_path("x.cpp", "#include <vector>\n");
    assert!(fixture.run(&IncludeOrder).is_empty());
}

#[test]
fn system_group_before_project_group_flagged() {
    let source = "#include <vector>\n\n#include \"util/Log.h\"\n";
    let fixture = Fixture::with_path("x.cpp", source);
    let diags = fixture.run(&IncludeOrder);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("group out of order"));
    assert!(diags[0].fix.is_none());
}

#[test]
fn pointer_only_header_suggests_forward_decl() {
    let source = "#include \"PVRChannel.h\"\n\
                  \n\
                  class CPlayer\n{\n  PVRChannel* m_channel;\n};\n";
    let fixture = Fixture::with_path("Player.h", source);
    let diags = fixture.run(&HeaderForwardDecl);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, HEADER_FWD_DECL_ID);
    assert!(diags[0].message.contains("PVRChannel"));
    assert!(diags[0].fix.is_none());
}

#[test]
fn value_member_keeps_include() {
    let source = "#include \"PVRChannel.h\"\n\
                  \n\
                  class CPlayer\n{\n  PVRChannel m_channel;\n};\n";
    let fixture = Fixture::with_path("Player.h", source);
    assert!(fixture.run(&HeaderForwardDecl).is_empty());
}

#[test]
fn source_files_not_judged() {
    let source = "#include \"PVRChannel.h\"\n\
                  \n\
                  class CPlayer\n{\n  PVRChannel* m_channel;\n};\n";
    let fixture = Fixture::with_path("Player.cpp", source);
    assert!(fixture.run(&HeaderForwardDecl).is_empty());
}

#[test]
fn unused_include_not_judged() {
    let source = "#include \"PVRChannel.h\"\n\nclass CPlayer\n{\n};\n";
    let fixture = Fixture::with_path("Player.h", source);
    assert!(fixture.run(&HeaderForwardDecl).is_empty());
}
