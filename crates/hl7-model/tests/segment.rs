mod common;

use std::rc::Rc;

use hl7_model::{
    Cardinality, FieldArg, FieldInit, FieldSpec, FieldType, FieldValue, GenericPrimitive,
    Hl7Version, ModelClassFactory, ModelContext, ModelError, Result, Segment, StructureType,
    TypeRegistry, Varies,
};

use common::oru_message;

fn set(value: &mut dyn FieldValue, text: &str) {
    value
        .downcast_mut::<GenericPrimitive>()
        .expect("primitive")
        .set_value(text);
}

fn value_of(value: &dyn FieldValue) -> Option<&str> {
    value
        .downcast_ref::<GenericPrimitive>()
        .and_then(GenericPrimitive::value)
}

#[test]
fn fields_follow_segment_definition() {
    let message = oru_message();
    let msh = message
        .root()
        .borrow_mut()
        .get_segment("MSH", 0)
        .expect("MSH");
    let mut msh = msh.borrow_mut();
    assert_eq!(msh.num_fields(), 4);
    assert_eq!(msh.field_type(4).expect("MSH-4").name(), "MSG");
    assert!(msh.is_field_required(1).expect("MSH-1"));
    assert_eq!(msh.field_length(2).expect("MSH-2"), 4);
    assert_eq!(msh.constructor_args(1).expect("MSH-1"), &[FieldArg::Message]);

    set(msh.field_rep(1, 0).expect("MSH-1"), "|");
    assert_eq!(value_of(msh.field(1).expect("MSH-1")[0].as_ref()), Some("|"));
    assert_eq!(msh.field_rep(1, 0).expect("MSH-1").type_name(), "ST");
}

#[test]
fn auto_extension_keeps_existing_values() {
    let message = oru_message();
    let msh = message
        .root()
        .borrow_mut()
        .get_segment("MSH", 0)
        .expect("MSH");
    let mut msh = msh.borrow_mut();
    set(msh.field_rep(3, 0).expect("MSH-3"), "LAB");

    msh.field_rep(12, 0)
        .expect("MSH-12")
        .downcast_mut::<Varies>()
        .expect("varies")
        .set_value("2.5");

    assert_eq!(msh.num_fields(), 12);
    assert_eq!(value_of(msh.field(3).expect("MSH-3")[0].as_ref()), Some("LAB"));
    for number in 5..=12 {
        assert_eq!(msh.field_type(number).expect("extension").name(), "*");
        assert_eq!(
            msh.max_repetitions(number).expect("extension"),
            Cardinality::Unbounded
        );
    }
    assert!(msh.field(11).expect("MSH-11").is_empty());
    assert_eq!(msh.field(12).expect("MSH-12").len(), 1);
}

#[test]
fn unbounded_field_grows_contiguously() {
    let message = oru_message();
    let result = message
        .root()
        .borrow_mut()
        .get_group("PATIENT_RESULT", 0)
        .expect("PATIENT_RESULT");
    let patient = result.borrow_mut().get_group("PATIENT", 0).expect("PATIENT");
    let pid = patient.borrow_mut().get_segment("PID", 0).expect("PID");
    let mut pid = pid.borrow_mut();

    for rep in 0..5 {
        set(pid.field_rep(2, rep).expect("PID-2"), &format!("ID{rep}"));
    }
    assert!(matches!(
        pid.field_rep(2, 7),
        Err(ModelError::RepetitionGap {
            requested: 7,
            current: 5,
            ..
        })
    ));
    let removed = pid.remove_field_repetition(2, 1).expect("remove");
    assert_eq!(value_of(removed.as_ref()), Some("ID1"));
    let remaining: Vec<_> = pid
        .field(2)
        .expect("PID-2")
        .iter()
        .map(|value| value_of(value.as_ref()).map(str::to_string))
        .collect();
    assert_eq!(
        remaining,
        vec![
            Some("ID0".to_string()),
            Some("ID2".to_string()),
            Some("ID3".to_string()),
            Some("ID4".to_string())
        ]
    );
    assert_eq!(
        pid.field_descriptions(),
        vec![Some("Set ID - PID"), Some("Patient Identifier List"), Some("Patient Name")]
    );
}

#[derive(Debug)]
struct NoExtensions;

impl ModelClassFactory for NoExtensions {
    fn message_type(&self, _name: &str, _version: Hl7Version) -> Option<StructureType> {
        None
    }

    fn group_type(&self, _name: &str, _version: Hl7Version) -> Option<StructureType> {
        None
    }

    fn segment_type(&self, _name: &str, _version: Hl7Version) -> Option<StructureType> {
        None
    }

    fn field_type(&self, _name: &str, _version: Hl7Version) -> Option<FieldType> {
        None
    }

    fn extension_field_type(&self, _version: Option<Hl7Version>) -> Result<FieldType> {
        Err(ModelError::Definition("no extension datatype".to_string()))
    }
}

#[test]
fn failed_extension_is_swallowed() {
    let context = ModelContext::new(Rc::new(NoExtensions)).with_version(Hl7Version::V2_5);
    let segment =
        Segment::create(&StructureType::segment("NTE", common::nte), Rc::new(context)).expect("NTE");
    let mut nte = segment.borrow_mut();
    assert!(matches!(
        nte.field(4),
        Err(ModelError::UnknownField { number: 4, .. })
    ));
    assert_eq!(nte.num_fields(), 2);
    assert!(nte.field_rep(2, 0).is_ok());
}

fn coded(init: &FieldInit<'_>) -> Result<Box<dyn FieldValue>> {
    init.message_arg(0)?;
    let table = init.integer_arg(1)?;
    Ok(Box::new(GenericPrimitive::typed(format!("ID{table:04}"))))
}

#[test]
fn custom_constructor_receives_recorded_arguments() {
    let context = ModelContext::new(Rc::new(TypeRegistry::new())).with_version(Hl7Version::V2_5);
    let segment =
        Segment::create(&StructureType::generic_segment("ZPI"), Rc::new(context)).expect("ZPI");
    let mut zpi = segment.borrow_mut();
    let coded_field = FieldType::new("ID", coded);
    zpi.add_field(
        FieldSpec::new(coded_field.clone()).args(vec![FieldArg::Message, FieldArg::Integer(136)]),
    );
    zpi.add_field(FieldSpec::new(coded_field).args(vec![FieldArg::Text("oops".to_string())]));

    assert_eq!(zpi.field_rep(1, 0).expect("ZPI-1").type_name(), "ID0136");
    let error = zpi.field_rep(2, 0).unwrap_err();
    assert_eq!(
        error.to_string(),
        "can't instantiate ID: invalid definition: ID expects a message argument at position 0, found text"
    );
    assert!(zpi.field(2).expect("ZPI-2").is_empty());
}
