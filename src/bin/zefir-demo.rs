//! Демонстрационный прогон: один и тот же объект через четыре бэкенда,
//! затем запросы по записанному XML-документу.

use std::{fs, path::PathBuf};

use tracing_subscriber::EnvFilter;

use zefir::{
    descendants, parse_document, select_path, select_where, BinaryCodec, Candy, Codec, Condition,
    JsonCodec, Packaging, Product, ProductKind, Settings, SoapCodec, XmlCodec,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::load()?;
    let out = PathBuf::from(&settings.out_dir);
    fs::create_dir_all(&out)?;

    let candy = Candy::new(
        "Lollipop",
        50.0,
        "Strawberry",
        ProductKind::Hard,
        Packaging::new("Plastic", 5.0, 10.0),
        40.0,
    );

    println!("BINARY");
    let binary = BinaryCodec;
    let path = out.join("candy.bin");
    binary.serialize(&candy, &path)?;
    let restored: Candy = binary.deserialize(&path)?;
    println!("{restored}\n");

    println!("SOAP");
    let soap = SoapCodec;
    let path = out.join("candy_soap.xml");
    // Полиморфный слот: восстановится именно Candy.
    let product = Product::Candy(candy.clone());
    soap.serialize(&product, &path)?;
    let restored: Product = soap.deserialize(&path)?;
    println!("{restored}\n");

    println!("JSON");
    let json = JsonCodec;
    let path = out.join("candy.json");
    json.serialize(&candy, &path)?;
    let restored: Candy = json.deserialize(&path)?;
    println!("{restored}\n");

    println!("XML");
    let xml = XmlCodec;
    let path = out.join("candy.xml");
    xml.serialize(&candy, &path)?;
    let restored: Candy = xml.deserialize(&path)?;
    println!("{restored}\n");

    let candies = vec![
        Candy::new(
            "Gummy Bear",
            30.0,
            "Apple",
            ProductKind::Gummy,
            Packaging::new("Paper", 3.0, 5.0),
            25.0,
        ),
        Candy::new(
            "Chocolate Bar",
            100.0,
            "Chocolate",
            ProductKind::Soft,
            Packaging::new("Foil", 10.0, 20.0),
            60.0,
        ),
    ];

    println!("XML list:");
    let list_path = out.join("candies.xml");
    xml.serialize(&candies, &list_path)?;
    let restored: Vec<Candy> = xml.deserialize(&list_path)?;
    for item in &restored {
        println!("{item}");
    }
    println!();

    // Запросы по уже записанному документу, без полного декодирования.
    let doc = parse_document(&fs::read_to_string(&list_path)?)?;

    println!("Candy names:");
    for el in select_path(&doc, "ArrayOfCandy/Candy/Name") {
        println!("{}", el.text());
    }
    println!();

    let cond = Condition::parse("SugarContent > 30")?;
    println!("Candies with SugarContent > 30:");
    for el in select_where(&doc, "ArrayOfCandy/Candy", &cond) {
        if let Some(name) = el.child_text("Name") {
            println!("{name}");
        }
    }
    println!();

    println!("Candy packaging:");
    for el in descendants(&doc, "Packaging") {
        if let Some(material) = el.child_text("Material") {
            println!("{material}");
        }
    }

    Ok(())
}
