use crate::{
    AppSettings, DormGuest, LoginRequest, LoginResponse, Message, Payment, RegisterRequest,
    ResetPasswordRequest, Room, RoomType, Student, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// The API client sends any `ApiRequest` generically: GET requests carry no
/// body, everything else is serialized as JSON.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// 认证端点 (Auth Endpoints)
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for RegisterRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Fetch the current user's profile (requires a bearer token).
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = User;
    const PATH: &'static str = "/users/profile";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for ResetPasswordRequest {
    /// fire-and-forget：服务端的响应体形态不定（消息包装或空），
    /// 调用方只关心成败，不读内容
    type Response = serde_json::Value;
    const PATH: &'static str = "/auth/reset-password";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 学生 (Students)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStudentsRequest;

impl ApiRequest for ListStudentsRequest {
    type Response = Vec<Student>;
    const PATH: &'static str = "/students";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub room_id: Option<u64>,
}

impl ApiRequest for CreateStudentRequest {
    type Response = Student;
    const PATH: &'static str = "/students";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Full-record update; the id travels inside the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub student: Student,
}

impl ApiRequest for UpdateStudentRequest {
    type Response = Student;
    const PATH: &'static str = "/students";
    const METHOD: HttpMethod = HttpMethod::Put;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStudentRequest {
    pub id: u64,
}

impl ApiRequest for DeleteStudentRequest {
    type Response = ();
    const PATH: &'static str = "/students";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

// =========================================================
// 访客 (Guests)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListGuestsRequest;

impl ApiRequest for ListGuestsRequest {
    type Response = Vec<DormGuest>;
    const PATH: &'static str = "/guests";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGuestRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub host_student_id: Option<u64>,
    pub room_id: Option<u64>,
    pub check_in: chrono::NaiveDate,
    pub check_out: Option<chrono::NaiveDate>,
}

impl ApiRequest for CreateGuestRequest {
    type Response = DormGuest;
    const PATH: &'static str = "/guests";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGuestRequest {
    pub id: u64,
}

impl ApiRequest for DeleteGuestRequest {
    type Response = ();
    const PATH: &'static str = "/guests";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

// =========================================================
// 房间与房型 (Rooms / Room Types)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRoomsRequest;

impl ApiRequest for ListRoomsRequest {
    type Response = Vec<Room>;
    const PATH: &'static str = "/rooms";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub number: String,
    pub floor: i32,
    pub room_type_id: u64,
    pub capacity: u32,
    pub notes: Option<String>,
}

impl ApiRequest for CreateRoomRequest {
    type Response = Room;
    const PATH: &'static str = "/rooms";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoomRequest {
    pub room: Room,
}

impl ApiRequest for UpdateRoomRequest {
    type Response = Room;
    const PATH: &'static str = "/rooms";
    const METHOD: HttpMethod = HttpMethod::Put;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRoomRequest {
    pub id: u64,
}

impl ApiRequest for DeleteRoomRequest {
    type Response = ();
    const PATH: &'static str = "/rooms";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRoomTypesRequest;

impl ApiRequest for ListRoomTypesRequest {
    type Response = Vec<RoomType>;
    const PATH: &'static str = "/room-types";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomTypeRequest {
    pub name: String,
    pub capacity: u32,
    pub monthly_price_cents: i64,
}

impl ApiRequest for CreateRoomTypeRequest {
    type Response = RoomType;
    const PATH: &'static str = "/room-types";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRoomTypeRequest {
    pub id: u64,
}

impl ApiRequest for DeleteRoomTypeRequest {
    type Response = ();
    const PATH: &'static str = "/room-types";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

// =========================================================
// 缴费 (Payments)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPaymentsRequest;

impl ApiRequest for ListPaymentsRequest {
    type Response = Vec<Payment>;
    const PATH: &'static str = "/payments";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Submit a payment; approval happens server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub student_id: u64,
    pub amount_cents: i64,
    pub semester: String,
}

impl ApiRequest for CreatePaymentRequest {
    type Response = Payment;
    const PATH: &'static str = "/payments";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 消息 (Messages)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMessagesRequest;

impl ApiRequest for ListMessagesRequest {
    type Response = Vec<Message>;
    const PATH: &'static str = "/messages";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// None 表示全员广播
    pub recipient_id: Option<u64>,
    pub subject: String,
    pub body: String,
}

impl ApiRequest for SendMessageRequest {
    type Response = Message;
    const PATH: &'static str = "/messages";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 系统设置 (Settings)
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct GetSettingsRequest;

impl ApiRequest for GetSettingsRequest {
    type Response = AppSettings;
    const PATH: &'static str = "/settings";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: AppSettings,
}

impl ApiRequest for UpdateSettingsRequest {
    type Response = AppSettings;
    const PATH: &'static str = "/settings";
    const METHOD: HttpMethod = HttpMethod::Put;
}
