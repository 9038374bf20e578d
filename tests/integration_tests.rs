use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_properties::{
    from_str, from_str_strict, from_str_with_options, is_empty, to_properties, to_string,
    to_string_with_options, to_value, Complex64, Delimiter, Error, ListFormat, MissingFields,
    Options, Value,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    notes: BTreeMap<String, String>,
    total: f64,
}

fn order() -> Order {
    let mut notes = BTreeMap::new();
    notes.insert("gift".to_string(), "yes".to_string());
    notes.insert("door".to_string(), "back, left".to_string());

    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        notes,
        total: 109.97,
    }
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let text = to_string(&user).unwrap();
    assert_eq!(
        text,
        "id=123\nname=Alice\nactive=true\ntags[0]=admin\ntags[1]=developer\n"
    );

    let user_back: User = from_str(&text).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let text = to_string(&order()).unwrap();
    assert_eq!(
        text,
        "order_id=12345\n\
         customer.id=123\n\
         customer.name=Alice\n\
         customer.active=true\n\
         customer.tags[0]=vip\n\
         items[0].sku=WIDGET-001\n\
         items[0].price=29.99\n\
         items[0].quantity=2\n\
         items[1].sku=GADGET-002\n\
         items[1].price=49.99\n\
         items[1].quantity=1\n\
         notes.door=back, left\n\
         notes.gift=yes\n\
         total=109.97\n"
    );

    let order_back: Order = from_str_strict(&text).unwrap();
    assert_eq!(order(), order_back);
}

#[test]
fn test_decoding_ignores_line_order() {
    let text = "total=1.5\nitems[1].sku=B\ncustomer.name=Bob\nitems[0].sku=A\norder_id=7";
    let order: Order = from_str(text).unwrap();
    assert_eq!(order.order_id, 7);
    assert_eq!(order.customer.name, "Bob");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].sku, "A");
    assert_eq!(order.items[1].sku, "B");
    assert_eq!(order.items[1].quantity, 0);
}

#[test]
fn test_prefix_boundary() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Fields {
        #[serde(rename = "A")]
        a: String,
        #[serde(rename = "AB")]
        ab: String,
    }

    let fields: Fields = from_str_strict("AB=x").unwrap();
    assert_eq!(fields.a, "");
    assert_eq!(fields.ab, "x");

    let fields: Fields = from_str_strict("A=1\nAB=2").unwrap();
    assert_eq!(fields.a, "1");
    assert_eq!(fields.ab, "2");
}

#[test]
fn test_prefix_boundary_for_nested_fields() {
    #[derive(Deserialize, Debug, Default)]
    struct Inner {
        x: String,
    }

    #[derive(Deserialize, Debug)]
    struct Outer {
        name: Inner,
        #[serde(rename = "nameExtra")]
        name_extra: Inner,
    }

    let outer: Outer = from_str_strict("nameExtra.x=1").unwrap();
    assert_eq!(outer.name.x, "");
    assert_eq!(outer.name_extra.x, "1");
}

#[test]
fn test_map_with_empty_key() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Config {
        props: HashMap<String, String>,
    }

    let config: Config = from_str("props.=v").unwrap();
    assert_eq!(config.props.len(), 1);
    assert_eq!(config.props[""], "v");

    assert_eq!(to_string(&config).unwrap(), "props.=v\n");
}

#[test]
fn test_sequence_gap_filling() {
    #[derive(Deserialize, Debug)]
    struct Post {
        tags: Vec<String>,
    }

    let post: Post = from_str("tags[0]=a\ntags[2]=c").unwrap();
    assert_eq!(post.tags, vec!["a", "", "c"]);
}

#[test]
fn test_omit_empty() {
    #[derive(Serialize, Debug)]
    struct Sparse {
        name: String,
        #[serde(skip_serializing_if = "is_empty")]
        labels: HashMap<String, String>,
        #[serde(skip_serializing_if = "is_empty")]
        count: i64,
        #[serde(skip_serializing_if = "is_empty")]
        enabled: bool,
        #[serde(skip_serializing_if = "is_empty")]
        note: Option<String>,
        nested: Nested,
    }

    #[derive(Serialize, Debug)]
    struct Nested {
        #[serde(skip_serializing_if = "serde_properties::is_empty")]
        value: f64,
    }

    let sparse = Sparse {
        name: "x".to_string(),
        labels: HashMap::new(),
        count: 0,
        enabled: false,
        note: None,
        nested: Nested { value: 0.0 },
    };
    assert_eq!(to_string(&sparse).unwrap(), "name=x\n");

    let full = Sparse {
        name: "x".to_string(),
        labels: HashMap::from([("k".to_string(), "v".to_string())]),
        count: 3,
        enabled: true,
        note: Some(String::new()),
        nested: Nested { value: 1.5 },
    };
    assert_eq!(
        to_string(&full).unwrap(),
        "name=x\nlabels.k=v\ncount=3\nenabled=true\nnote=\nnested.value=1.5\n"
    );
}

#[test]
fn test_skip_and_rename() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Account {
        #[serde(rename = "user.name")]
        user_name: String,
        #[serde(skip)]
        password: String,
        #[serde(rename = "Port")]
        port: u16,
    }

    let account = Account {
        user_name: "root".to_string(),
        password: "hunter2".to_string(),
        port: 22,
    };
    let text = to_string(&account).unwrap();
    assert_eq!(text, "user.name=root\nPort=22\n");

    let err = from_str_strict::<Account>(&format!("{}password=leaked\n", text)).unwrap_err();
    assert!(err.is_unmatched());

    let back: Account = from_str(&text).unwrap();
    assert_eq!(back.user_name, "root");
    assert_eq!(back.password, "");
    assert_eq!(back.port, 22);
}

#[test]
fn test_unknown_key_tolerance() {
    #[derive(Deserialize, Debug)]
    struct Known {
        name: String,
    }

    let text = "name=x\nnonexistent=field\n";
    let known: Known = from_str(text).unwrap();
    assert_eq!(known.name, "x");

    let err = from_str_strict::<Known>(text).unwrap_err();
    assert!(err.is_unmatched());
    assert!(err.to_string().contains("nonexistent=field"));
    match err {
        Error::UnmatchedKey { line, text } => {
            assert_eq!(line, Some(2));
            assert_eq!(text, "nonexistent=field");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_conversion_failure() {
    #[derive(Deserialize, Debug)]
    struct Person {
        age: u32,
    }

    let err = from_str::<Person>("age=invalid").unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.key(), Some("age"));
    assert!(err.to_string().contains("invalid"));
}

#[test]
fn test_nested_conversion_failure_names_full_key() {
    let err = from_str::<Order>("items[1].quantity=-1").unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.key(), Some("items[1].quantity"));
}

#[test]
fn test_boolean_literals() {
    #[derive(Deserialize, Debug)]
    struct Flags {
        a: bool,
        b: bool,
        c: bool,
        d: bool,
    }

    let flags: Flags = from_str("a=TRUE\nb=no\nc=1\nd=off").unwrap();
    assert!(flags.a);
    assert!(!flags.b);
    assert!(flags.c);
    assert!(!flags.d);

    assert!(from_str::<Flags>("a=maybe").unwrap_err().is_parse());
}

#[test]
fn test_numbers_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Numbers {
        small: i8,
        big: u64,
        neg: i64,
        ratio: f32,
        huge: f64,
        tiny: f64,
    }

    let numbers = Numbers {
        small: -128,
        big: u64::MAX,
        neg: i64::MIN,
        ratio: 0.1,
        huge: 1.5e300,
        tiny: -2.5e-10,
    };
    let text = to_string(&numbers).unwrap();
    assert!(text.contains("ratio=0.1\n"));
    assert_eq!(from_str::<Numbers>(&text).unwrap(), numbers);
}

#[test]
fn test_integer_overflow_is_parse_error() {
    #[derive(Deserialize, Debug)]
    struct Small {
        n: u8,
    }

    let err = from_str::<Small>("n=300").unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.key(), Some("n"));
}

#[test]
fn test_complex_numbers() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Circuit {
        #[serde(with = "serde_properties::text")]
        impedance: Complex64,
        #[serde(with = "serde_properties::text")]
        admittance: Complex64,
    }

    let circuit = Circuit {
        impedance: Complex64::new(50.0, -25.5),
        admittance: Complex64::new(0.0, 0.0),
    };
    let text = to_string(&circuit).unwrap();
    assert_eq!(text, "impedance=50-25.5i\nadmittance=0+0i\n");
    assert_eq!(from_str::<Circuit>(&text).unwrap(), circuit);

    let err = from_str::<Circuit>("impedance=fifty").unwrap_err();
    assert_eq!(err.key(), Some("impedance"));
}

#[test]
fn test_opaque_types_with_text_form() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Event {
        name: String,
        at: DateTime<Utc>,
        finished: Option<DateTime<Utc>>,
        #[serde(with = "serde_properties::text")]
        id: BigInt,
    }

    let event = Event {
        name: "deploy".to_string(),
        at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        finished: None,
        id: "123456789012345678901234567890".parse().unwrap(),
    };

    let text = to_string(&event).unwrap();
    assert_eq!(
        text,
        "name=deploy\nat=2024-01-15T10:30:00Z\nid=123456789012345678901234567890\n"
    );
    assert_eq!(from_str::<Event>(&text).unwrap(), event);

    let err = from_str::<Event>("at=yesterday").unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.key(), Some("at"));
}

#[test]
fn test_enums() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Level {
        Info,
        Debug,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Auth {
        None,
        Token(String),
        Basic { user: String, password: String },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Service {
        level: Level,
        auth: Auth,
        fallback: Auth,
    }

    let service = Service {
        level: Level::Debug,
        auth: Auth::Basic {
            user: "admin".to_string(),
            password: "secret".to_string(),
        },
        fallback: Auth::Token("abc".to_string()),
    };

    let text = to_string(&service).unwrap();
    assert_eq!(
        text,
        "level=debug\nauth.Basic.user=admin\nauth.Basic.password=secret\nfallback.Token=abc\n"
    );
    assert_eq!(from_str_strict::<Service>(&text).unwrap(), service);

    let defaulted: Service = from_str("").unwrap();
    assert_eq!(defaulted.level, Level::Info);
    assert_eq!(defaulted.auth, Auth::None);
}

#[test]
fn test_maps_of_structs_and_sequences() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Endpoint {
        host: String,
        ports: Vec<u16>,
    }

    let mut endpoints = BTreeMap::new();
    endpoints.insert(
        "primary".to_string(),
        Endpoint {
            host: "a".to_string(),
            ports: vec![80, 443],
        },
    );
    endpoints.insert(
        "backup".to_string(),
        Endpoint {
            host: "b".to_string(),
            ports: vec![],
        },
    );

    let text = to_string(&endpoints).unwrap();
    assert_eq!(
        text,
        "backup.host=b\nprimary.host=a\nprimary.ports[0]=80\nprimary.ports[1]=443\n"
    );
    assert_eq!(
        from_str_strict::<BTreeMap<String, Endpoint>>(&text).unwrap(),
        endpoints
    );
}

#[test]
fn test_integer_map_keys() {
    let mut codes: BTreeMap<u16, String> = BTreeMap::new();
    codes.insert(404, "Not Found".to_string());
    codes.insert(200, "OK".to_string());

    let text = to_string(&codes).unwrap();
    assert_eq!(text, "200=OK\n404=Not Found\n");
    assert_eq!(from_str::<BTreeMap<u16, String>>(&text).unwrap(), codes);
}

#[test]
fn test_composite_map_key_is_shape_error() {
    let mut map = BTreeMap::new();
    map.insert(vec![1, 2], "x");
    assert!(to_string(&map).unwrap_err().is_shape());
}

#[test]
fn test_optional_nested_struct() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Tls {
        cert: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Listener {
        port: u16,
        tls: Option<Tls>,
    }

    let plain = Listener { port: 80, tls: None };
    let text = to_string(&plain).unwrap();
    assert_eq!(text, "port=80\n");
    assert_eq!(from_str::<Listener>(&text).unwrap(), plain);

    let secure = Listener {
        port: 443,
        tls: Some(Tls {
            cert: "/etc/cert.pem".to_string(),
        }),
    };
    let text = to_string(&secure).unwrap();
    assert_eq!(text, "port=443\ntls.cert=/etc/cert.pem\n");
    assert_eq!(from_str::<Listener>(&text).unwrap(), secure);
}

#[test]
fn test_missing_fields_skip() {
    #[derive(Deserialize, Debug)]
    struct Config {
        #[serde(default = "default_workers")]
        workers: u32,
        name: String,
    }

    fn default_workers() -> u32 {
        4
    }

    let options = Options::new().with_missing_fields(MissingFields::Skip);

    let zeroed: Config = from_str("name=a").unwrap();
    assert_eq!(zeroed.workers, 0);

    let defaulted: Config = from_str_with_options("name=a", options.clone()).unwrap();
    assert_eq!(defaulted.workers, 4);

    let err = from_str_with_options::<Config>("workers=2", options).unwrap_err();
    assert!(err.to_string().contains("missing field `name`"));
}

#[test]
fn test_inline_lists() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Post {
        title: String,
        tags: Vec<String>,
        scores: Vec<u8>,
        authors: Vec<User>,
    }

    let post = Post {
        title: "Hello".to_string(),
        tags: vec!["go".to_string(), "programming".to_string()],
        scores: vec![],
        authors: vec![User {
            id: 1,
            name: "Ann".to_string(),
            active: false,
            tags: vec!["x".to_string(), "y".to_string()],
        }],
    };

    let options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Comma));
    let text = to_string_with_options(&post, options.clone()).unwrap();
    assert_eq!(
        text,
        "title=Hello\ntags=go,programming\nauthors[0].id=1\nauthors[0].name=Ann\nauthors[0].active=false\nauthors[0].tags=x,y\n"
    );
    assert_eq!(from_str_with_options::<Post>(&text, options).unwrap(), post);
}

#[test]
fn test_inline_list_items_are_trimmed() {
    #[derive(Deserialize, Debug)]
    struct Post {
        tags: Vec<String>,
    }

    let options = Options::strict().with_list_format(ListFormat::Inline(Delimiter::Comma));
    let post: Post = from_str_with_options("tags = go, programming ,rust", options).unwrap();
    assert_eq!(post.tags, vec!["go", "programming", "rust"]);
}

#[test]
fn test_custom_separators_and_comments() {
    #[derive(Deserialize, Debug)]
    struct Link {
        url: String,
        title: String,
    }

    let options = Options::new()
        .with_separators(&['='])
        .with_comment_markers(&[';']);
    let text = "; a comment\n# not a comment=1\nurl=http://example.com\ntitle: ignored\ntitle=Home";
    let link: Link = from_str_with_options(text, options).unwrap();
    assert_eq!(link.url, "http://example.com");
    assert_eq!(link.title, "Home");
}

#[test]
fn test_to_value() {
    let value = to_value(&order()).unwrap();
    assert_eq!(
        value.pointer("items[1].sku"),
        Some(&Value::from("GADGET-002"))
    );
    assert_eq!(
        value.pointer("customer.active").and_then(Value::as_str),
        Some("true")
    );
    assert_eq!(value.pointer("notes").and_then(Value::as_map).map(|m| m.len()), Some(2));
}

#[test]
fn test_to_properties_preserves_traversal_order() {
    let props = to_properties(&order()).unwrap();
    let keys: Vec<&str> = props.keys().take(3).collect();
    assert_eq!(keys, vec!["order_id", "customer.id", "customer.name"]);
}

#[test]
fn test_borrowed_strings() {
    #[derive(Deserialize, Debug)]
    struct View<'a> {
        name: &'a str,
    }

    let props = serde_properties::Properties::parse("name=borrowed");
    let view: View = serde_properties::from_properties(&props).unwrap();
    assert_eq!(view.name, "borrowed");
}
