use std::{env, error::Error, fs, path::PathBuf};

use prost::Message;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
    field_descriptor_proto::{Label, Type},
};
use tonic_build::manual::{Builder, Method, Service};

const PACKAGE: &str = "movies";

// (rust name, rpc name, request, response)
const METHODS: [(&str, &str, &str, &str); 4] = [
    ("get_movies", "GetMovies", "GetMoviesRequest", "GetMoviesResponse"),
    ("get_movie", "GetMovie", "GetMovieRequest", "GetMovieResponse"),
    ("create_movie", "CreateMovie", "CreateMovieRequest", "CreateMovieResponse"),
    ("delete_movie", "DeleteMovie", "DeleteMovieRequest", "DeleteMovieResponse"),
];

fn unary(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::rpc::pb::{input}"))
        .output_type(format!("crate::rpc::pb::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(format!(".{PACKAGE}.{type_name}")),
        ..field(name, number, ty)
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto { name: Some(name.to_string()), field: fields, ..Default::default() }
}

/// Failure fields shared by every response, starting at `first`.
fn outcome(first: i32) -> Vec<FieldDescriptorProto> {
    vec![
        field("success", first, Type::Bool),
        field("error", first + 1, Type::String),
        typed("error_kind", first + 2, Type::Enum, "ErrorKind"),
    ]
}

/// Descriptor of the wire messages in `src/rpc/pb.rs`, served by reflection.
fn descriptor_set() -> FileDescriptorSet {
    let movie_field = |number| typed("movie", number, Type::Message, "Movie");
    let id = || vec![field("id", 1, Type::Int32)];

    let movies = FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..typed("movies", 1, Type::Message, "Movie")
    };
    let mut get_movies = vec![movies, field("total", 2, Type::Uint64)];
    get_movies.extend(outcome(3));
    let mut get_movie = vec![movie_field(1)];
    get_movie.extend(outcome(2));
    let mut create_movie = vec![movie_field(1)];
    create_movie.extend(outcome(2));

    let error_kind = EnumDescriptorProto {
        name: Some("ErrorKind".to_string()),
        value: ["UNSPECIFIED", "INVALID_DATA", "NOT_FOUND", "ALREADY_EXISTS", "STORAGE"]
            .iter()
            .enumerate()
            .map(|(number, name)| EnumValueDescriptorProto {
                name: Some(format!("ERROR_KIND_{name}")),
                number: Some(number as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };

    let service = ServiceDescriptorProto {
        name: Some("MovieService".to_string()),
        method: METHODS
            .iter()
            .map(|(_, route, input, output)| MethodDescriptorProto {
                name: Some(route.to_string()),
                input_type: Some(format!(".{PACKAGE}.{input}")),
                output_type: Some(format!(".{PACKAGE}.{output}")),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };

    let file = FileDescriptorProto {
        name: Some("movies.proto".to_string()),
        package: Some(PACKAGE.to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![
            message("Movie", vec![
                field("id", 1, Type::Int32),
                field("title", 2, Type::String),
                field("year", 3, Type::String),
            ]),
            message("GetMoviesRequest", vec![
                field("page", 1, Type::Int32),
                field("limit", 2, Type::Int32),
            ]),
            message("GetMoviesResponse", get_movies),
            message("GetMovieRequest", id()),
            message("GetMovieResponse", get_movie),
            message("CreateMovieRequest", vec![
                field("title", 1, Type::String),
                field("year", 2, Type::String),
            ]),
            message("CreateMovieResponse", create_movie),
            message("DeleteMovieRequest", id()),
            message("DeleteMovieResponse", outcome(1)),
        ],
        enum_type: vec![error_kind],
        service: vec![service],
        ..Default::default()
    };

    FileDescriptorSet { file: vec![file] }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let mut service = Service::builder().name("MovieService").package(PACKAGE);
    for (name, route, input, output) in METHODS {
        service = service.method(unary(name, route, input, output));
    }
    Builder::new().compile(&[service.build()]);

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("movies_descriptor.bin"), descriptor_set().encode_to_vec())?;
    Ok(())
}
