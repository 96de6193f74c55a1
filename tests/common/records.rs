use chrono::NaiveDate;

use delimited_rs::mapping::{
    binding::{FieldRead, FieldWrite},
    schema::{Record, Schema},
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Character {
    pub updated: NaiveDate,
    pub name: String,
    pub age: i32,
    pub evil: bool,
    pub rating: Option<f64>,
}

impl Record for Character {
    fn describe(schema: &mut Schema<Self>) {
        schema
            .property("Updated", |c: &Character| c.updated, |c, v| c.updated = v)
            .read(FieldRead::heading("Updated").required(true))
            .write(FieldWrite::heading("Updated").column_index(0));
        schema
            .property("Name", |c: &Character| c.name.clone(), |c, v| c.name = v)
            .read(FieldRead::heading("Name").alternate_names(["Full Name"]))
            .write(FieldWrite::heading("Name").column_index(1));
        schema
            .property("Age", |c: &Character| c.age, |c, v| c.age = v)
            .read(FieldRead::heading("Age"))
            .write(FieldWrite::heading("Age").column_index(2));
        schema
            .property("Evil", |c: &Character| c.evil, |c, v| c.evil = v)
            .read(FieldRead::heading("Evil"))
            .write(FieldWrite::heading("Evil").column_index(3));
        schema
            .property("Rating", |c: &Character| c.rating, |c, v| c.rating = v)
            .read(FieldRead::heading("Rating"))
            .write(FieldWrite::heading("Rating"));
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn road_runner() -> Character {
    Character {
        updated: date(2003, 11, 20),
        name: "Road Runner".to_string(),
        age: 11,
        evil: false,
        rating: Some(4.5),
    }
}

pub fn coyote() -> Character {
    Character {
        updated: date(1949, 9, 17),
        name: "Wile E. \"Genius\" Coyote, Esq.".to_string(),
        age: 12,
        evil: true,
        rating: None,
    }
}
