//! Catalog fixtures.

/// One list with a two-word level and a five-word level.
pub const CATALOG_JSON: &str = r#"[
  {
    "id": "list-a",
    "name": "List A",
    "levels": [
      {
        "id": "pair",
        "name": "Pair",
        "words": [
          {"id": "a", "word": "abate", "definition": "to lessen", "fillInBlank": "The storm began to ____."},
          {"id": "b", "word": "banal", "definition": "lacking originality", "fillInBlank": "A ____ remark."}
        ]
      },
      {
        "id": "basic",
        "name": "Basic",
        "words": [
          {"id": "c1", "word": "candid", "definition": "frank", "fillInBlank": "A ____ answer."},
          {"id": "c2", "word": "cajole", "definition": "to coax", "fillInBlank": "She tried to ____ him."},
          {"id": "c3", "word": "callous", "definition": "insensitive", "fillInBlank": "A ____ act."},
          {"id": "c4", "word": "candor", "definition": "openness", "fillInBlank": "He spoke with ____."},
          {"id": "c5", "word": "capricious", "definition": "fickle", "fillInBlank": "A ____ ruler."}
        ]
      }
    ]
  }
]"#;
