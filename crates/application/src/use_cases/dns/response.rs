use hickory_proto::op::{Message, MessageType, ResponseCode};

/// Empty response to `request` carrying `code`, with the question echoed.
pub fn error_response(request: &Message, code: ResponseCode) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    response.set_response_code(code);
    for query in request.queries() {
        response.add_query(query.clone());
    }
    response
}
