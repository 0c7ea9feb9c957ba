use graphgen_core::{
    ErrorClass, GenerationError, GenerationErrorCode, GraphKind, GraphRequest, OrderStatisticError,
    ServiceBuilder, ServiceError, ServiceErrorCode, generate,
};
use rstest::rstest;

#[rstest]
#[case(GenerationError::EmptyGraph, GenerationErrorCode::EmptyGraph, ErrorClass::Validation)]
#[case(
    GenerationError::NodeLimitExceeded { nodes: 101, max_nodes: 100 },
    GenerationErrorCode::NodeLimitExceeded,
    ErrorClass::Validation,
)]
#[case(
    GenerationError::InvalidWeightBounds { min: 0, max: 0 },
    GenerationErrorCode::InvalidWeightBounds,
    ErrorClass::Validation,
)]
#[case(
    GenerationError::PairingExhausted { attempts: 64 },
    GenerationErrorCode::PairingExhausted,
    ErrorClass::Capacity,
)]
#[case(
    GenerationError::ConnectivityRepairExhausted { passes: 32, components: 2 },
    GenerationErrorCode::ConnectivityRepairExhausted,
    ErrorClass::Capacity,
)]
#[case(
    GenerationError::Sampling(OrderStatisticError::Empty),
    GenerationErrorCode::Sampling,
    ErrorClass::Capacity,
)]
fn generation_errors_expose_codes_and_classes(
    #[case] error: GenerationError,
    #[case] code: GenerationErrorCode,
    #[case] class: ErrorClass,
) {
    assert_eq!(error.code(), code);
    assert_eq!(error.class(), class);
    assert!(error.code().as_str().starts_with("GENERATION_"));
}

#[rstest]
#[case::zero_nodes(
    GraphRequest::new(1, GraphKind::Complete, 0, 0),
    GenerationErrorCode::EmptyGraph,
)]
#[case::degree_too_high(
    GraphRequest::new(2, GraphKind::ExactDegree { degree: 5 }, 5, 0),
    GenerationErrorCode::InvalidParameters,
)]
#[case::odd_endpoint_sum(
    GraphRequest::new(3, GraphKind::ExactDegree { degree: 3 }, 7, 0),
    GenerationErrorCode::InvalidParameters,
)]
#[case::inverted_bounds(
    GraphRequest::new(4, GraphKind::BetweenDegree { min: 4, max: 2 }, 10, 0),
    GenerationErrorCode::InvalidParameters,
)]
#[case::average_out_of_range(
    GraphRequest::new(5, GraphKind::AverageDegree { average: 1.0 }, 10, 0),
    GenerationErrorCode::InvalidParameters,
)]
fn generate_rejects_infeasible_requests(
    #[case] request: GraphRequest,
    #[case] expected: GenerationErrorCode,
) {
    let err = generate(&request).expect_err("request is infeasible");
    assert_eq!(err.code(), expected);
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[test]
fn zero_workers_are_rejected() {
    let err = ServiceBuilder::new()
        .with_workers(0)
        .build()
        .expect_err("zero workers are invalid");
    assert_eq!(err.code(), ServiceErrorCode::InvalidConfig);
    assert!(matches!(err, ServiceError::InvalidConfig { .. }));
    assert_eq!(err.generation_code(), None);
}
