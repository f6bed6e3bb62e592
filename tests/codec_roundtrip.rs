use std::fs;

use tempfile::tempdir;

use zefir::{
    BinaryCodec, Candy, Codec, CodecError, JsonCodec, Packaging, Product, ProductKind, SoapCodec,
    XmlCodec,
};

fn lollipop() -> Candy {
    Candy::new(
        "Lollipop",
        50.0,
        "Strawberry",
        ProductKind::Hard,
        Packaging::new("Plastic", 5.0, 10.0),
        40.0,
    )
}

#[test]
fn test_binary_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("candy.bin");
    let candy = lollipop();

    BinaryCodec.serialize(&candy, &path).unwrap();
    let back: Candy = BinaryCodec.deserialize(&path).unwrap();

    assert_eq!(back, candy);
    // Поля вне идентичности тоже должны пережить round-trip.
    assert_eq!(back.flavor, candy.flavor);
    assert_eq!(back.info.packaging, candy.info.packaging);
    assert_eq!(back.info.sugar_content, candy.info.sugar_content);
}

#[test]
fn test_binary_wrong_declared_type_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packaging.bin");

    BinaryCodec
        .serialize(&Packaging::new("Foil", 1.0, 2.0), &path)
        .unwrap();
    let res: Result<Candy, _> = BinaryCodec.deserialize(&path);
    assert!(matches!(res.unwrap_err(), CodecError::Malformed(_)));
}

#[test]
fn test_json_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("candy.json");
    let candy = lollipop();

    JsonCodec.serialize(&candy, &path).unwrap();
    let back: Candy = JsonCodec.deserialize(&path).unwrap();
    assert_eq!(back, candy);
    assert_eq!(back.flavor, candy.flavor);
}

#[test]
fn test_json_wrong_declared_type_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packaging.json");

    JsonCodec
        .serialize(&Packaging::new("Foil", 1.0, 2.0), &path)
        .unwrap();
    let res: Result<Candy, _> = JsonCodec.deserialize(&path);
    assert!(matches!(res.unwrap_err(), CodecError::Malformed(_)));
}

#[test]
fn test_soap_polymorphic_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("candy_soap.xml");
    let product = Product::Candy(lollipop());

    SoapCodec.serialize(&product, &path).unwrap();
    let back: Product = SoapCodec.deserialize(&path).unwrap();

    assert_eq!(back, product);
    let Product::Candy(candy) = back;
    assert_eq!(candy.flavor, "Strawberry");
}

#[test]
fn test_soap_unregistered_type_tag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bonbon.xml");
    fs::write(
        &path,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<zefir.Bonbon />\n",
    )
    .unwrap();

    let res: Result<Product, _> = SoapCodec.deserialize(&path);
    match res.unwrap_err() {
        CodecError::UnknownType(tag) => assert_eq!(tag, "zefir.Bonbon"),
        other => panic!("Expected UnknownType, got {other:?}"),
    }
}

#[test]
fn test_xml_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("candy.xml");
    let candy = lollipop();

    XmlCodec.serialize(&candy, &path).unwrap();
    let back: Candy = XmlCodec.deserialize(&path).unwrap();
    assert_eq!(back, candy);
    assert_eq!(back.flavor, candy.flavor);
}

#[test]
fn test_xml_wrong_declared_type_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packaging.xml");

    XmlCodec
        .serialize(&Packaging::new("Foil", 1.0, 2.0), &path)
        .unwrap();
    let res: Result<Candy, _> = XmlCodec.deserialize(&path);
    assert!(matches!(res.unwrap_err(), CodecError::Malformed(_)));
}

#[test]
fn test_roundtrip_equality_ignores_non_identity_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("candy.json");

    JsonCodec.serialize(&lollipop(), &path).unwrap();
    let back: Candy = JsonCodec.deserialize(&path).unwrap();

    // Равенство держится на имени, весе и виде; остальное может отличаться.
    let mut other = lollipop();
    other.flavor = "Cherry".into();
    other.info.sugar_content = 99.0;
    other.info.packaging = Packaging::new("Paper", 1.0, 1.0);
    assert_eq!(back, other);

    let mut renamed = lollipop();
    renamed.info.name = "Toffee".into();
    assert_ne!(back, renamed);
}

#[test]
fn test_failed_decode_releases_file_handle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("candy.bin");

    BinaryCodec.serialize(&lollipop(), &path).unwrap();
    // Испортим заголовок, чтобы декодирование упало.
    let mut bytes = fs::read(&path).unwrap();
    bytes[0] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let res: Result<Candy, _> = BinaryCodec.deserialize(&path);
    assert!(matches!(res.unwrap_err(), CodecError::Malformed(_)));

    // Дескриптор освобождён: файл можно сразу переписать и прочитать заново.
    BinaryCodec.serialize(&lollipop(), &path).unwrap();
    let back: Candy = BinaryCodec.deserialize(&path).unwrap();
    assert_eq!(back, lollipop());
}

#[test]
fn test_serialize_to_unwritable_destination_is_io() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("candy.bin");

    let err = BinaryCodec.serialize(&lollipop(), &path).unwrap_err();
    assert!(matches!(err, CodecError::Io(_)));
}

#[test]
fn test_deserialize_missing_source_is_io() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let res: Result<Candy, _> = JsonCodec.deserialize(&path);
    assert!(matches!(res.unwrap_err(), CodecError::Io(_)));
}
