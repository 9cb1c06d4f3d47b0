use super::*;
use crate::RedeclarePolicy;
use pretty_assertions::assert_eq;

fn declare(family: &TypeFamily, name: &str) -> Spec {
    family
        .declare(Declaration::new(ScopePath::root(), name))
        .unwrap()
}

#[test]
fn declared_template_is_its_absent_specialization() {
    let family = TypeFamily::new();
    let vec = declare(&family, "Vec");

    assert_eq!(family.apply(vec, Param::Absent).unwrap(), vec);
    assert_eq!(family.template_count(), 1);
    assert_eq!(family.specialization_count(), 1);
}

#[test]
fn specialize_is_idempotent() {
    let family = TypeFamily::new();
    let vec = declare(&family, "Vec");
    let root = family.template_of(vec).unwrap();

    let first = family.specialize(root, Param::Int(1)).unwrap();
    let second = family.specialize(root, Param::Int(1)).unwrap();
    assert_eq!(first, second);
    assert_eq!(family.specialization_count(), 2);
}

#[test]
fn specialize_unknown_template_fails_without_caching() {
    let family = TypeFamily::new();
    let vec = declare(&family, "Vec");

    // Template #1 exists in `other` only.
    let other = TypeFamily::new();
    declare(&other, "A");
    let foreign_root = other.template_of(declare(&other, "B")).unwrap();

    let err = family.specialize(foreign_root, Param::Int(1)).unwrap_err();
    assert_eq!(err, FamilyError::UnknownTemplate { id: foreign_root });
    assert_eq!(family.specialization_count(), 1);
    assert_eq!(family.apply(vec, 1).unwrap(), family.apply(vec, 1).unwrap());
}

#[test]
fn unhashable_parameter_is_not_cached() {
    let family = TypeFamily::new();
    let vec = declare(&family, "Vec");

    let err = family.apply(vec, f64::NAN).unwrap_err();
    assert!(matches!(err, FamilyError::UnhashableParameter { .. }));
    assert_eq!(family.specialization_count(), 1);
}

#[test]
fn negative_zero_and_zero_share_a_specialization() {
    let family = TypeFamily::new();
    let vec = declare(&family, "Vec");
    assert_eq!(family.apply(vec, -0.0).unwrap(), family.apply(vec, 0.0).unwrap());
}

#[test]
fn foreign_handles_are_rejected() {
    let family = TypeFamily::new();
    let other = TypeFamily::new();
    let foreign = declare(&other, "Vec");

    assert_eq!(
        family.apply(foreign, 1),
        Err(FamilyError::NotASpecialization { spec: foreign })
    );
    let vec = declare(&family, "Vec");
    assert_eq!(
        family.apply(vec, foreign),
        Err(FamilyError::NotASpecialization { spec: foreign })
    );
}

#[test]
fn duplicate_declaration_is_rejected_by_default() {
    let family = TypeFamily::new();
    declare(&family, "Vec");

    let err = family
        .declare(Declaration::new(ScopePath::root(), "Vec"))
        .unwrap_err();
    assert_eq!(
        err,
        FamilyError::DuplicateIdentity {
            path: "Vec".to_owned()
        }
    );
    assert_eq!(family.template_count(), 1);
}

#[test]
fn identical_redeclaration_can_be_reused() {
    let family =
        TypeFamily::with_config(FamilyConfig::default().with_redeclare(RedeclarePolicy::ReuseIdentical));
    let scope = family.scope(["test_caching"]).unwrap();

    let first = family
        .declare(Declaration::new(scope.clone(), "A").member("size", 2))
        .unwrap();
    let again = family
        .declare(Declaration::new(scope.clone(), "A").member("size", 2))
        .unwrap();
    assert_eq!(first, again);

    let changed = family.declare(Declaration::new(scope, "A").member("size", 3));
    assert!(matches!(changed, Err(FamilyError::DuplicateIdentity { .. })));
}

#[test]
fn param_member_is_reserved() {
    let family = TypeFamily::new();
    let err = family
        .declare(Declaration::new(ScopePath::root(), "Vec").member("param", 1))
        .unwrap_err();
    assert_eq!(
        err,
        FamilyError::ReservedMember {
            path: "Vec".to_owned(),
            name: "param".to_owned()
        }
    );
    assert_eq!(family.template_count(), 0);
}

#[test]
fn subclass_inherits_nearest_param() {
    let family = TypeFamily::new();
    let a = declare(&family, "A");
    let a5 = family.apply(a, 5).unwrap();

    let b = family
        .declare(Declaration::new(ScopePath::root(), "B").extends(a5))
        .unwrap();
    assert_eq!(family.get_param(b).unwrap(), Param::Int(5));

    // Grandchild inherits through B.
    let c = family
        .declare(Declaration::new(ScopePath::root(), "C").extends(b))
        .unwrap();
    assert_eq!(family.get_param(c).unwrap(), Param::Int(5));
}

#[test]
fn leftmost_unspecialized_base_is_the_nearest_ancestor() {
    let family = TypeFamily::new();
    let mixin = declare(&family, "Mixin");
    let a = declare(&family, "A");
    let a5 = family.apply(a, 5).unwrap();

    let m = family
        .declare(
            Declaration::new(ScopePath::root(), "M")
                .extends(mixin)
                .extends(a5),
        )
        .unwrap();
    assert_eq!(family.get_param(m).unwrap(), Param::Absent);
}

#[test]
fn explicit_absent_base_is_not_skipped() {
    let family = TypeFamily::new();
    let x = declare(&family, "X");
    let a = family
        .declare(Declaration::new(ScopePath::root(), "A").extends(family.apply(x, 5).unwrap()))
        .unwrap();
    assert_eq!(family.get_param(a).unwrap(), Param::Int(5));

    // class B(A[Absent]): the explicit parameter wins over X[5] further up.
    let b = family
        .declare(
            Declaration::new(ScopePath::root(), "B")
                .extends(family.apply(a, Param::Absent).unwrap()),
        )
        .unwrap();
    assert_eq!(family.get_param(b).unwrap(), Param::Absent);
    assert!(family.is_subclass(b, &x).unwrap());
}

#[test]
fn leftmost_base_wins_conflicting_params() {
    let family = TypeFamily::new();
    let a = declare(&family, "A");
    let b = declare(&family, "B");
    let a1 = family.apply(a, 1).unwrap();
    let b2 = family.apply(b, 2).unwrap();

    let left = family
        .declare(Declaration::new(ScopePath::root(), "L").extends(a1).extends(b2))
        .unwrap();
    let right = family
        .declare(Declaration::new(ScopePath::root(), "R").extends(b2).extends(a1))
        .unwrap();
    assert_eq!(family.get_param(left).unwrap(), Param::Int(1));
    assert_eq!(family.get_param(right).unwrap(), Param::Int(2));
}

#[test]
fn walk_visits_depth_first_left_to_right_once() {
    let family = TypeFamily::new();
    let base = declare(&family, "Base");
    let left = family
        .declare(Declaration::new(ScopePath::root(), "Left").extends(base))
        .unwrap();
    let right = family
        .declare(Declaration::new(ScopePath::root(), "Right").extends(base))
        .unwrap();
    let diamond = family
        .declare(
            Declaration::new(ScopePath::root(), "Diamond")
                .extends(left)
                .extends(right),
        )
        .unwrap();

    let mut order = Vec::new();
    let stopped = family
        .walk(&[diamond], |spec, _, _| {
            order.push(spec);
            ControlFlow::<()>::Continue(())
        })
        .unwrap();
    assert_eq!(stopped, None);
    assert_eq!(order, vec![diamond, left, base, right]);
}

#[test]
fn members_are_canonicalized() {
    let family = TypeFamily::new();
    let vec = family
        .declare(Declaration::new(ScopePath::root(), "Vec").member("zero", -0.0))
        .unwrap();
    let def = family.definition_of(family.template_of(vec).unwrap()).unwrap();
    assert_eq!(def.members[0].value, Param::float(0.0));
}

#[test]
fn foreign_string_params_are_rejected() {
    let family = TypeFamily::new();
    let other = TypeFamily::new();
    let vec = declare(&family, "Vec");

    let foreign = other.str_param("only_elsewhere").unwrap();
    let Param::Str { name, .. } = foreign else {
        panic!("str_param returned {foreign:?}");
    };
    assert_eq!(
        family.apply(vec, foreign.clone()),
        Err(FamilyError::ForeignString { name })
    );
    assert_eq!(
        family.apply(vec, Param::tuple([Param::Int(1), foreign])),
        Err(FamilyError::ForeignString { name })
    );

    // A name carrying this family's tag but never interned here. Some shard
    // of `scratch` holds at least 7 names, while `family` holds at most 2
    // per shard.
    let scratch = StringInterner::new();
    let forged = (0..100)
        .map(|i| scratch.try_intern(&format!("s{i}")).unwrap())
        .max_by_key(|name| name.local())
        .unwrap();
    assert_eq!(
        family.apply(
            vec,
            Param::Str {
                family: family.tag(),
                name: forged,
            }
        ),
        Err(FamilyError::ForeignString { name: forged })
    );
    assert_eq!(family.specialization_count(), 1);

    let own = family.str_param("xy").unwrap();
    assert_eq!(family.apply(vec, own.clone()).unwrap(), family.apply(vec, own).unwrap());
}

#[test]
fn full_cache_leaves_registry_unchanged() {
    let family = TypeFamily {
        cache: SpecCache::with_shard_capacity(0),
        ..TypeFamily::new()
    };

    let err = family
        .declare(Declaration::new(ScopePath::root(), "Vec"))
        .unwrap_err();
    assert!(matches!(err, FamilyError::CacheOverflow { .. }));
    assert_eq!(family.template_count(), 0);
    assert_eq!(family.specialization_count(), 0);

    // The site is still free: the retry fails on the cache again, not as a
    // duplicate declaration.
    let retry = family
        .declare(Declaration::new(ScopePath::root(), "Vec"))
        .unwrap_err();
    assert!(matches!(retry, FamilyError::CacheOverflow { .. }));
}

#[test]
fn reuse_existing_returns_original_type_for_changed_body() {
    let family =
        TypeFamily::with_config(FamilyConfig::default().with_redeclare(RedeclarePolicy::ReuseExisting));
    let scope = family.scope(["test_caching"]).unwrap();
    let base = declare(&family, "Base");
    let base7 = family.apply(base, 7).unwrap();

    let first = family
        .declare(Declaration::new(scope.clone(), "A").extends(base7).member("size", 2))
        .unwrap();
    let again = family
        .declare(Declaration::new(scope, "A").extends(base).member("size", 3))
        .unwrap();

    assert_eq!(first, again);
    assert_eq!(family.get_param(again).unwrap(), Param::Int(7));
    assert_eq!(family.attr(again, "size").unwrap(), Some(Param::Int(2)));
    assert_eq!(family.template_count(), 2);
}
