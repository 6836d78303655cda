mod common;

use std::rc::Rc;

use hl7_model::{
    ErrorCode, ErrorKind, Group, Hl7Version, Message, ModelContext, ModelError, ModelOptions,
    StructureKind, StructureType, TypeRegistry,
};

use common::{factory, oru_message};

fn empty_root(name: &str, version: Option<Hl7Version>) -> hl7_model::GroupRef {
    let mut context = ModelContext::new(Rc::new(TypeRegistry::new())).with_message_name(name);
    if let Some(version) = version {
        context = context.with_version(version);
    }
    Group::create(&StructureType::generic_group(name), Rc::new(context)).expect("root")
}

#[test]
fn group_slots_drop_the_message_prefix() {
    let message = oru_message();
    let root = message.root().borrow();
    assert_eq!(root.names(), vec!["MSH", "PATIENT_RESULT"]);
    assert_eq!(message.name(), "ORU_R01");
    assert!(root.is_required("PATIENT_RESULT").expect("slot"));
    assert!(root.is_repeating("PATIENT_RESULT").expect("slot"));
    assert!(!root.is_repeating("MSH").expect("slot"));
    assert_eq!(
        root.class_of("PATIENT_RESULT").expect("slot").name(),
        "ORU_R01_PATIENT_RESULT"
    );
}

#[test]
fn nested_groups_are_created_lazily() {
    let message = oru_message();
    assert_eq!(message.root().borrow().reps("PATIENT_RESULT").expect("slot"), 0);

    let result = message
        .root()
        .borrow_mut()
        .get_group("PATIENT_RESULT", 0)
        .expect("PATIENT_RESULT");
    assert_eq!(result.borrow().name(), "PATIENT_RESULT");
    assert_eq!(
        result.borrow().names(),
        vec!["PATIENT", "ORDER_OBSERVATION"]
    );
    assert_eq!(result.borrow().reps("ORDER_OBSERVATION").expect("slot"), 0);

    let order = result
        .borrow_mut()
        .get_group("ORDER_OBSERVATION", 0)
        .expect("ORDER_OBSERVATION");
    assert_eq!(order.borrow().names(), vec!["OBR", "NTE", "OBSERVATION"]);
    let parent = order.borrow().parent().expect("parent");
    assert!(Rc::ptr_eq(&parent, &result));
}

#[test]
fn colliding_names_get_numeric_suffixes() {
    let message = Message::for_name("TST_T01", Hl7Version::V2_5, factory()).expect("TST_T01");
    let mut root = message.root().borrow_mut();
    assert_eq!(root.names(), vec!["MSH", "NTE", "PID", "NTE2", "NTE3"]);

    let first = root.get_segment("NTE", 0).expect("NTE");
    let second = root.get_segment("NTE2", 0).expect("NTE2");
    let third = root.get_segment("NTE3", 0).expect("NTE3");
    assert!(!Rc::ptr_eq(&first, &second));
    assert!(!Rc::ptr_eq(&second, &third));
    assert_eq!(second.borrow().name(), "NTE");
    assert!(root.is_repeating("NTE2").expect("slot"));
    assert!(!root.is_repeating("NTE3").expect("slot"));
}

#[test]
fn repetitions_grow_contiguously() {
    let root = empty_root("TST_T01", Some(Hl7Version::V2_5));
    let mut group = root.borrow_mut();
    group.declare(StructureType::generic_segment("MSH"), true, false);
    group.declare(StructureType::generic_group("TST_T01_ORDER"), false, true);

    let first = group.get("ORDER", 0).expect("rep 0");
    let second = group.get("ORDER", 1).expect("rep 1");
    let error = group.get("ORDER", 3).unwrap_err();
    assert!(matches!(
        error,
        ModelError::RepetitionGap {
            requested: 3,
            current: 2,
            ..
        }
    ));
    assert_eq!(error.kind(), ErrorKind::Arity);
    assert!(group.get("ORDER", 0).expect("again").ptr_eq(&first));

    let removed = group.remove_at("ORDER", 0).expect("remove");
    assert!(removed.ptr_eq(&first));
    let remaining = group.all_instances("ORDER").expect("slot");
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].ptr_eq(&second));
}

#[test]
fn non_repeating_slot_holds_one_instance() {
    let root = empty_root("TST_T01", Some(Hl7Version::V2_5));
    let mut group = root.borrow_mut();
    group.declare(StructureType::generic_segment("MSH"), true, false);

    let msh = group.get("MSH", 0).expect("MSH");
    assert!(group.get("MSH", 0).expect("again").ptr_eq(&msh));
    assert!(matches!(
        group.get("MSH", 1),
        Err(ModelError::NonRepeating { .. })
    ));
    assert!(matches!(
        group.add_new("MSH"),
        Err(ModelError::NonRepeating { .. })
    ));

    assert!(group.remove_instance("MSH", &msh).expect("remove"));
    let recreated = group.add_new("MSH").expect("recreate");
    assert!(!recreated.ptr_eq(&msh));
    assert!(group.get("MSH", 1).is_err());
}

#[test]
fn remove_by_identity_matches_remove_by_index() {
    let build = || {
        let root = empty_root("TST_T01", Some(Hl7Version::V2_5));
        root.borrow_mut()
            .declare(StructureType::generic_segment("NTE"), false, true);
        let instances: Vec<_> = (0..4)
            .map(|_| root.borrow_mut().add_new("NTE").expect("add"))
            .collect();
        (root, instances)
    };

    let (by_index, index_instances) = build();
    by_index.borrow_mut().remove_at("NTE", 2).expect("remove");
    let (by_identity, identity_instances) = build();
    let target = identity_instances[2].clone();
    assert!(
        by_identity
            .borrow_mut()
            .remove_instance("NTE", &target)
            .expect("remove")
    );

    let position = |root: &hl7_model::GroupRef, instances: &[hl7_model::Structure]| -> Vec<usize> {
        root.borrow()
            .all_instances("NTE")
            .expect("slot")
            .iter()
            .map(|kept| {
                instances
                    .iter()
                    .position(|original| original.ptr_eq(kept))
                    .expect("original")
            })
            .collect()
    };
    assert_eq!(position(&by_index, &index_instances), vec![0, 1, 3]);
    assert_eq!(position(&by_identity, &identity_instances), vec![0, 1, 3]);
}

#[test]
fn removing_a_foreign_instance_reports_false() {
    let root = empty_root("TST_T01", Some(Hl7Version::V2_5));
    let mut group = root.borrow_mut();
    group.declare(StructureType::generic_segment("NTE"), false, true);
    group.declare(StructureType::generic_segment("OBX"), false, true);
    group.add_new("NTE").expect("NTE");
    let obx = group.add_new("OBX").expect("OBX");

    assert!(!group.remove_instance("NTE", &obx).expect("known slot"));
    assert_eq!(group.reps("NTE").expect("slot"), 1);
    assert!(matches!(
        group.remove_instance("ZZZ", &obx),
        Err(ModelError::UnknownStructure { .. })
    ));
}

#[test]
fn insert_repetition_places_instance_at_index() {
    let root = empty_root("TST_T01", Some(Hl7Version::V2_5));
    let mut group = root.borrow_mut();
    group.declare(StructureType::generic_segment("NTE"), false, true);
    let first = group.add_new("NTE").expect("first");
    let inserted = group.insert_repetition("NTE", 0).expect("insert");
    let instances = group.all_instances("NTE").expect("slot");
    assert!(instances[0].ptr_eq(&inserted));
    assert!(instances[1].ptr_eq(&first));
    assert!(matches!(
        group.insert_repetition("NTE", 5),
        Err(ModelError::IndexOutOfBounds { index: 5, len: 2, .. })
    ));
}

#[test]
fn unknown_slot_names_are_rejected() {
    let message = oru_message();
    let error = message.get("PID", 0).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownName);
    assert_eq!(error.to_string(), "PID does not exist in the group ORU_R01");
    assert_eq!(error.code(), ErrorCode::ApplicationInternalError);
}

#[test]
fn unknown_segment_falls_back_to_generic() {
    let root = empty_root("TST_T01", Some(Hl7Version::V2_5));
    let mut group = root.borrow_mut();
    let name = group.append_unknown("ZZZ").expect("append");
    assert_eq!(name, "ZZZ");
    assert!(!group.is_required("ZZZ").expect("slot"));
    assert!(group.is_repeating("ZZZ").expect("slot"));
    assert_eq!(group.reps("ZZZ").expect("slot"), 0);

    let class = group.class_of("ZZZ").expect("slot");
    assert!(class.is_generic());
    assert_eq!(class.kind(), StructureKind::Segment);

    let segment = group.get_segment("ZZZ", 0).expect("ZZZ");
    assert_eq!(segment.borrow().name(), "ZZZ");
    assert_eq!(segment.borrow().num_fields(), 0);
}

#[test]
fn unknown_segment_resolves_registered_type() {
    let message = oru_message();
    let name = message.append_unknown("NTE").expect("append");
    assert_eq!(name, "NTE");
    let root = message.root().borrow();
    let class = root.class_of("NTE").expect("slot");
    assert!(!class.is_generic());
    assert_eq!(root.names().last(), Some(&"NTE"));

    drop(root);
    let second = message.append_unknown("NTE").expect("append again");
    assert_eq!(second, "NTE2");
}

#[test]
fn unknown_segment_requires_a_version() {
    let root = empty_root("TST_T01", None);
    let error = root.borrow_mut().append_unknown("ZZZ").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Configuration);
    assert_eq!(error.code(), ErrorCode::UnsupportedVersionId);
    assert!(root.borrow().names().is_empty());
}

#[test]
fn unknown_segment_that_cannot_be_built_is_not_declared() {
    let message = oru_message();
    let error = message.append_unknown("ZBK").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Instantiation);
    assert_eq!(
        error.to_string(),
        "can't instantiate ZBK: invalid definition: ZBK has no field table"
    );
    assert_eq!(message.root().borrow().names(), vec!["MSH", "PATIENT_RESULT"]);
}

#[test]
fn strict_options_reject_unresolvable_segments() {
    let context = ModelContext::new(factory())
        .with_version(Hl7Version::V2_5)
        .with_options(ModelOptions::strict());
    let message = Message::from_context(&common::oru_type(), context).expect("ORU_R01");
    assert!(matches!(
        message.append_unknown("ZZZ"),
        Err(ModelError::UnknownStructure { .. })
    ));
    assert!(message.append_unknown("NTE").is_ok());
}

#[test]
fn clear_drops_instances_and_keeps_slots() {
    let message = oru_message();
    message.get("MSH", 0).expect("MSH");
    message.add_new("PATIENT_RESULT").expect("PATIENT_RESULT");
    let mut root = message.root().borrow_mut();
    assert!(root.is_empty());
    root.clear();
    assert_eq!(root.reps("MSH").expect("slot"), 0);
    assert_eq!(root.names(), vec!["MSH", "PATIENT_RESULT"]);
}

#[test]
fn generic_message_for_unknown_type() {
    let message = Message::for_name("ZZZ_Z99", Hl7Version::V2_5, factory()).expect("generic");
    assert!(message.is_generic());
    assert_eq!(message.name(), "ZZZ_Z99");
    assert_eq!(message.version(), Some(Hl7Version::V2_5));
    assert!(message.root().borrow().names().is_empty());
    assert_eq!(message.validation_context().name(), "none");

    let typed = Message::for_name("oru_r01", Hl7Version::V2_5, factory()).expect("typed");
    assert!(!typed.is_generic());
    assert!(Message::new(&StructureType::generic_segment("MSH"), Hl7Version::V2_5, factory()).is_err());
}
