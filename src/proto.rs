//! Protobuf messages for exported clustering results.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClusteredDataLabels {
    #[prost(uint32, repeated, tag = "1")]
    pub data: ::prost::alloc::vec::Vec<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FloatList {
    #[prost(float, repeated, tag = "1")]
    pub values: ::prost::alloc::vec::Vec<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClusteredDataCentroids {
    #[prost(message, repeated, tag = "1")]
    pub data: ::prost::alloc::vec::Vec<FloatList>,
}
